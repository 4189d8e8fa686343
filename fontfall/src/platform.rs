// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform font handles and the system font boundary.

use core::fmt;
use std::sync::Arc;

use super::attributes::{FontOrientation, FontWidthVariant};
use super::data::SimpleFont;
use super::description::FontDescriptionKey;
use super::face::{Face, FaceId};

/// A concrete font: one face instantiated at one pixel size with a
/// particular set of synthetic adjustments.
///
/// Handles are cheap to clone; the face is shared.
#[derive(Clone)]
pub struct PlatformFont {
    face: Arc<dyn Face>,
    size: f32,
    synthetic_bold: bool,
    synthetic_italic: bool,
    orientation: FontOrientation,
    width_variant: FontWidthVariant,
}

impl PlatformFont {
    /// Creates a handle for the given face and pixel size.
    pub fn new(face: Arc<dyn Face>, size: f32) -> Self {
        Self {
            face,
            size,
            synthetic_bold: false,
            synthetic_italic: false,
            orientation: FontOrientation::default(),
            width_variant: FontWidthVariant::default(),
        }
    }

    /// Returns this handle with synthetic bold and italic flags applied.
    pub fn with_synthetics(mut self, bold: bool, italic: bool) -> Self {
        self.synthetic_bold = bold;
        self.synthetic_italic = italic;
        self
    }

    /// Returns this handle with the given advance direction.
    pub fn with_orientation(mut self, orientation: FontOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns this handle with the given width variant.
    pub fn with_width_variant(mut self, width_variant: FontWidthVariant) -> Self {
        self.width_variant = width_variant;
        self
    }

    /// Returns the shared face.
    pub fn face(&self) -> &Arc<dyn Face> {
        &self.face
    }

    /// Returns the pixel size.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns `true` if a synthetic bold should be applied.
    pub fn synthetic_bold(&self) -> bool {
        self.synthetic_bold
    }

    /// Returns `true` if a synthetic oblique should be applied.
    pub fn synthetic_italic(&self) -> bool {
        self.synthetic_italic
    }

    /// Returns the advance direction this handle was instantiated for.
    pub fn orientation(&self) -> FontOrientation {
        self.orientation
    }

    /// Returns the width variant this handle was instantiated for.
    pub fn width_variant(&self) -> FontWidthVariant {
        self.width_variant
    }

    /// Returns the same face at a size scaled by the given factor.
    pub fn scaled(&self, scale: f32) -> Self {
        let mut copy = self.clone();
        copy.size = self.size * scale;
        copy
    }

    /// Returns the identity key for this handle.
    pub fn key(&self) -> PlatformFontKey {
        PlatformFontKey {
            face: self.face.id(),
            size: self.size.to_bits(),
            synthetic_bold: self.synthetic_bold,
            synthetic_italic: self.synthetic_italic,
            orientation: self.orientation,
            width_variant: self.width_variant,
        }
    }
}

impl fmt::Debug for PlatformFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformFont")
            .field("face", &self.face.id())
            .field("size", &self.size)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

/// Value identity of a [`PlatformFont`], used to key the realized font
/// cache.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PlatformFontKey {
    face: FaceId,
    size: u32,
    synthetic_bold: bool,
    synthetic_italic: bool,
    orientation: FontOrientation,
    width_variant: FontWidthVariant,
}

/// Platform font enumeration primitives.
///
/// One implementation per target platform, injected into
/// [`FontCache::new`]. All methods are synchronous lookups.
///
/// [`FontCache::new`]: crate::FontCache::new
pub trait FontSystem {
    /// Produces a handle for the given family name, or `None` if no such
    /// family is installed.
    fn resolve(&self, key: &FontDescriptionKey, family: &str) -> Option<PlatformFont>;

    /// Produces the platform's best-guess substitute font for the given
    /// character, expressed as UTF-16 code units.
    ///
    /// `original` is the font the character failed to resolve against,
    /// when one exists; `is_platform_font` is `true` when that font was
    /// constructed directly from platform data rather than through a
    /// family list.
    fn fallback_for_characters(
        &self,
        key: &FontDescriptionKey,
        original: Option<&SimpleFont>,
        is_platform_font: bool,
        code_units: &[u16],
    ) -> Option<PlatformFont>;

    /// Produces the font used when no entry of a family list resolves.
    fn last_resort(&self, key: &FontDescriptionKey) -> Option<PlatformFont>;
}

impl fmt::Debug for dyn FontSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FontSystem")
    }
}
