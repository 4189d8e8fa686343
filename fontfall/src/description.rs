// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font descriptions and the keys used to memoize platform lookups.

use smallvec::SmallVec;
use std::sync::Arc;

use super::attributes::{
    FontOrientation, FontRenderingMode, FontStyle, FontWeight, FontWidthVariant, TextOrientation,
};

type FamilyVec = SmallVec<[Arc<str>; 2]>;

/// Description of the font requested for a run of text.
///
/// This is the style-system side of a font request: an ordered family
/// list plus the attributes that select and shape a concrete face. One
/// description is shared by every family entry; per-family cache keys
/// are produced with [`FontDescriptionKey::new`].
#[derive(Clone, Debug)]
pub struct FontDescription {
    families: FamilyVec,
    size: f32,
    weight: FontWeight,
    style: FontStyle,
    orientation: FontOrientation,
    text_orientation: TextOrientation,
    width_variant: FontWidthVariant,
    rendering_mode: FontRenderingMode,
    use_printer_font: bool,
    small_caps: bool,
}

impl FontDescription {
    /// Creates a description with the given family list and pixel size.
    ///
    /// All other attributes take their default values.
    pub fn new<'a>(families: impl IntoIterator<Item = &'a str>, size: f32) -> Self {
        Self {
            families: families.into_iter().map(Into::into).collect(),
            size,
            weight: FontWeight::default(),
            style: FontStyle::default(),
            orientation: FontOrientation::default(),
            text_orientation: TextOrientation::default(),
            width_variant: FontWidthVariant::default(),
            rendering_mode: FontRenderingMode::default(),
            use_printer_font: false,
            small_caps: false,
        }
    }

    /// Returns the ordered family list.
    pub fn families(&self) -> impl Iterator<Item = &str> + '_ + Clone {
        self.families.iter().map(|f| &**f)
    }

    /// Returns the family name at the given index.
    pub fn family_at(&self, index: usize) -> Option<&str> {
        self.families.get(index).map(|f| &**f)
    }

    /// Returns the number of entries in the family list.
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Returns the requested size in pixels.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns the requested size rounded to whole pixels, as used in
    /// platform cache keys.
    pub fn computed_pixel_size(&self) -> u32 {
        // Sizes are non-negative in practice; guard anyway since the
        // value flows into a cache key.
        if self.size > 0.0 {
            (self.size + 0.5) as u32
        } else {
            0
        }
    }

    /// Returns the requested weight.
    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// Sets the requested weight.
    pub fn set_weight(&mut self, weight: FontWeight) {
        self.weight = weight;
    }

    /// Returns the requested style.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Sets the requested style.
    pub fn set_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    /// Returns the requested glyph advance direction.
    pub fn orientation(&self) -> FontOrientation {
        self.orientation
    }

    /// Sets the requested glyph advance direction.
    pub fn set_orientation(&mut self, orientation: FontOrientation) {
        self.orientation = orientation;
    }

    /// Returns the treatment of non-CJK characters in vertical text.
    pub fn text_orientation(&self) -> TextOrientation {
        self.text_orientation
    }

    /// Sets the treatment of non-CJK characters in vertical text.
    pub fn set_text_orientation(&mut self, text_orientation: TextOrientation) {
        self.text_orientation = text_orientation;
    }

    /// Returns the requested width variant.
    pub fn width_variant(&self) -> FontWidthVariant {
        self.width_variant
    }

    /// Sets the requested width variant.
    pub fn set_width_variant(&mut self, width_variant: FontWidthVariant) {
        self.width_variant = width_variant;
    }

    /// Returns the requested rendering mode.
    pub fn rendering_mode(&self) -> FontRenderingMode {
        self.rendering_mode
    }

    /// Sets the requested rendering mode.
    pub fn set_rendering_mode(&mut self, rendering_mode: FontRenderingMode) {
        self.rendering_mode = rendering_mode;
    }

    /// Returns `true` if a printer font was requested.
    pub fn use_printer_font(&self) -> bool {
        self.use_printer_font
    }

    /// Sets whether a printer font is requested.
    pub fn set_use_printer_font(&mut self, use_printer_font: bool) {
        self.use_printer_font = use_printer_font;
    }

    /// Returns `true` if small capitals were requested.
    pub fn small_caps(&self) -> bool {
        self.small_caps
    }

    /// Sets whether small capitals are requested.
    pub fn set_small_caps(&mut self, small_caps: bool) {
        self.small_caps = small_caps;
    }
}

/// Key for memoizing one platform font lookup.
///
/// Combines a single family name with the attribute tuple of a
/// [`FontDescription`]. Family name comparison is case-insensitive.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontDescriptionKey {
    family: FamilyKey,
    size: u32,
    weight: u32,
    style: FontStyle,
    orientation: FontOrientation,
    text_orientation: TextOrientation,
    width_variant: FontWidthVariant,
    rendering_mode: FontRenderingMode,
    use_printer_font: bool,
}

impl FontDescriptionKey {
    /// Creates a key for the given description and family name.
    pub fn new(description: &FontDescription, family: &str) -> Self {
        Self {
            family: FamilyKey::from_str(family),
            size: description.computed_pixel_size(),
            weight: description.weight().key_bits(),
            style: description.style(),
            orientation: description.orientation(),
            text_orientation: description.text_orientation(),
            width_variant: description.width_variant(),
            rendering_mode: description.rendering_mode(),
            use_printer_font: description.use_printer_font(),
        }
    }

    /// Returns a copy of this key with a different family name.
    pub fn with_family(&self, family: &str) -> Self {
        let mut key = self.clone();
        key.family = FamilyKey::from_str(family);
        key
    }

    /// Returns the size in whole pixels recorded in this key.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the style recorded in this key.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Returns the orientation recorded in this key.
    pub fn orientation(&self) -> FontOrientation {
        self.orientation
    }

    /// Returns the width variant recorded in this key.
    pub fn width_variant(&self) -> FontWidthVariant {
        self.width_variant
    }
}

/// Case-insensitive family name, normalized to lowercase bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
struct FamilyKey {
    data: SmallVec<[u8; 32]>,
}

impl FamilyKey {
    fn from_str(s: &str) -> Self {
        let mut res = Self::default();
        let mut buf = [0_u8; 4];
        for ch in s.chars() {
            for ch in ch.to_lowercase() {
                res.data
                    .extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_equality_is_case_insensitive_on_family() {
        let description = FontDescription::new(["Arial"], 16.0);
        let a = FontDescriptionKey::new(&description, "Arial");
        let b = FontDescriptionKey::new(&description, "ARIAL");
        let c = FontDescriptionKey::new(&description, "arial");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn key_distinguishes_attributes() {
        let mut description = FontDescription::new(["Arial"], 16.0);
        let normal = FontDescriptionKey::new(&description, "Arial");
        description.set_style(FontStyle::Italic);
        let italic = FontDescriptionKey::new(&description, "Arial");
        assert_ne!(normal, italic);

        let small = FontDescription::new(["Arial"], 12.0);
        assert_ne!(normal, FontDescriptionKey::new(&small, "Arial"));
    }

    #[test]
    fn computed_pixel_size_rounds() {
        assert_eq!(FontDescription::new(["A"], 16.4).computed_pixel_size(), 16);
        assert_eq!(FontDescription::new(["A"], 16.5).computed_pixel_size(), 17);
        assert_eq!(FontDescription::new(["A"], -1.0).computed_pixel_size(), 0);
    }
}
