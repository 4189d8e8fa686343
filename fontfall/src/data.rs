// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Realized fonts: faces instantiated with pixel metrics and variant
//! sub-fonts.

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::attributes::{FontOrientation, FontVariant, Pitch};
use super::glyph_page::GlyphData;
use super::platform::PlatformFont;

/// Scale applied to a font to derive its small capitals form.
const SMALL_CAPS_SCALE: f32 = 0.7;

/// Scale applied to a font to derive its emphasis mark form.
const EMPHASIS_MARK_SCALE: f32 = 0.5;

/// Unique identifier for a realized font.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct FontId(u64);

impl FontId {
    /// Creates a new unique identifier.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        static ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the underlying integer value.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

/// Pixel-space metrics of a realized font.
#[derive(Copy, Clone, Default, Debug)]
pub struct FontMetrics {
    /// Distance from the baseline to the top of the em box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the em box.
    pub descent: f32,
    /// Recommended additional spacing between lines.
    pub line_gap: f32,
    /// Height of the lowercase `x`.
    pub x_height: f32,
    /// Average character advance.
    pub avg_char_width: f32,
    /// Maximum character advance.
    pub max_char_width: f32,
    /// Advance of the space glyph.
    pub space_width: f32,
}

/// One physical font realized at a pixel size.
pub struct SimpleFont {
    id: FontId,
    platform: PlatformFont,
    metrics: FontMetrics,
    space_glyph: Option<u16>,
    is_custom: bool,
    is_loading: bool,
    is_broken_ideograph_fallback: bool,
    is_text_orientation_fallback: bool,
    has_vertical_glyphs: bool,
    derived: RefCell<DerivedFonts>,
}

impl SimpleFont {
    /// Realizes the given platform font.
    pub fn new(platform: PlatformFont) -> Arc<Self> {
        Self::with_flags(platform, false, false)
    }

    /// Realizes a custom (author-supplied) font, optionally still
    /// loading.
    pub fn new_custom(platform: PlatformFont, is_loading: bool) -> Arc<Self> {
        Self::with_flags(platform, true, is_loading)
    }

    fn with_flags(platform: PlatformFont, is_custom: bool, is_loading: bool) -> Arc<Self> {
        Arc::new(Self::build(platform, is_custom, is_loading))
    }

    fn build(platform: PlatformFont, is_custom: bool, is_loading: bool) -> Self {
        let face = platform.face().clone();
        let design = face.metrics();
        let scale = if design.units_per_em != 0 {
            platform.size() / design.units_per_em as f32
        } else {
            0.0
        };
        let space_glyph = face.glyph_for_char(' ' as u32);
        let space_width = space_glyph
            .map(|glyph| face.advance_for_glyph(glyph) * scale)
            .unwrap_or(0.0);
        let metrics = FontMetrics {
            ascent: design.ascent as f32 * scale,
            descent: design.descent as f32 * scale,
            line_gap: design.line_gap as f32 * scale,
            x_height: design.x_height.unwrap_or(0) as f32 * scale,
            avg_char_width: design.avg_char_width.unwrap_or(0) as f32 * scale,
            max_char_width: design.max_char_width.unwrap_or(0) as f32 * scale,
            space_width,
        };
        let has_vertical_glyphs = face.has_vertical_glyphs();
        Self {
            id: FontId::new(),
            platform,
            metrics,
            space_glyph,
            is_custom,
            is_loading,
            is_broken_ideograph_fallback: false,
            is_text_orientation_fallback: false,
            has_vertical_glyphs,
            derived: RefCell::new(DerivedFonts::default()),
        }
    }

    /// Returns the unique identity of this font.
    pub fn id(&self) -> FontId {
        self.id
    }

    /// Returns the platform handle.
    pub fn platform(&self) -> &PlatformFont {
        &self.platform
    }

    /// Returns the pixel-space metrics.
    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Returns the glyph for the space character, if covered.
    pub fn space_glyph(&self) -> Option<u16> {
        self.space_glyph
    }

    /// Returns `true` if this font came from a selector rather than the
    /// platform.
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// Returns `true` if this is an interstitial font standing in while
    /// a custom font loads.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Returns `true` if this font is the square-substitution fallback
    /// for ideographs.
    pub fn is_broken_ideograph_fallback(&self) -> bool {
        self.is_broken_ideograph_fallback
    }

    /// Returns `true` if this font was derived to satisfy a text
    /// orientation preference.
    pub fn is_text_orientation_fallback(&self) -> bool {
        self.is_text_orientation_fallback
    }

    /// Returns `true` if the underlying face has vertical glyph support.
    pub fn has_vertical_glyphs(&self) -> bool {
        self.has_vertical_glyphs
    }

    /// Returns the advance direction this font was instantiated for.
    pub fn orientation(&self) -> FontOrientation {
        self.platform.orientation()
    }

    /// Returns the nominal glyph for the given codepoint.
    pub fn glyph_for_char(&self, codepoint: u32) -> Option<u16> {
        self.platform.face().glyph_for_char(codepoint)
    }

    /// Returns the pitch classification of this font.
    pub fn pitch(&self) -> Pitch {
        if self.platform.face().is_fixed_pitch() {
            Pitch::Fixed
        } else {
            Pitch::Variable
        }
    }

    /// Returns the placeholder glyph used when no font can supply a real
    /// one.
    pub fn missing_glyph_data(self: &Arc<Self>) -> GlyphData {
        GlyphData {
            glyph: 0,
            font: self.clone(),
        }
    }

    /// Returns the small capitals form of this font, creating it on
    /// first use.
    pub fn small_caps_font(self: &Arc<Self>) -> Arc<Self> {
        if let Some(font) = self.derived.borrow().small_caps.clone() {
            return font;
        }
        let font = Self::with_flags(
            self.platform.scaled(SMALL_CAPS_SCALE),
            self.is_custom,
            false,
        );
        self.derived.borrow_mut().small_caps = Some(font.clone());
        font
    }

    /// Returns the emphasis mark form of this font, creating it on
    /// first use.
    pub fn emphasis_mark_font(self: &Arc<Self>) -> Arc<Self> {
        if let Some(font) = self.derived.borrow().emphasis_mark.clone() {
            return font;
        }
        let font = Self::with_flags(
            self.platform.scaled(EMPHASIS_MARK_SCALE),
            self.is_custom,
            false,
        );
        self.derived.borrow_mut().emphasis_mark = Some(font.clone());
        font
    }

    /// Returns the square-substitution form used for ideographs that a
    /// vertical font cannot render with vertical alternates.
    pub fn broken_ideograph_font(self: &Arc<Self>) -> Arc<Self> {
        if let Some(font) = self.derived.borrow().broken_ideograph.clone() {
            return font;
        }
        let font = self.derive(self.platform.clone(), |font| {
            font.is_broken_ideograph_fallback = true;
        });
        self.derived.borrow_mut().broken_ideograph = Some(font.clone());
        font
    }

    /// Returns the form of this font used to render non-CJK characters
    /// rotated in vertical text.
    pub fn vertical_right_orientation_font(self: &Arc<Self>) -> Arc<Self> {
        if let Some(font) = self.derived.borrow().vertical_right.clone() {
            return font;
        }
        let platform = self.platform.clone().with_orientation(FontOrientation::Horizontal);
        let font = self.derive(platform, |font| {
            font.is_text_orientation_fallback = true;
        });
        self.derived.borrow_mut().vertical_right = Some(font.clone());
        font
    }

    /// Returns the form of this font used to render non-CJK characters
    /// upright in vertical text.
    pub fn upright_orientation_font(self: &Arc<Self>) -> Arc<Self> {
        if let Some(font) = self.derived.borrow().upright.clone() {
            return font;
        }
        let font = self.derive(self.platform.clone(), |font| {
            font.is_text_orientation_fallback = true;
        });
        self.derived.borrow_mut().upright = Some(font.clone());
        font
    }

    /// Returns the variant-specific derived form of this font, or `None`
    /// for the normal variant.
    pub fn variant_font(self: &Arc<Self>, variant: FontVariant) -> Option<Arc<Self>> {
        match variant {
            FontVariant::SmallCaps => Some(self.small_caps_font()),
            FontVariant::EmphasisMark => Some(self.emphasis_mark_font()),
            FontVariant::BrokenIdeograph => Some(self.broken_ideograph_font()),
            FontVariant::Auto | FontVariant::Normal => None,
        }
    }

    /// Collects the identities of every derived form materialized so
    /// far, for page pruning when this font is destroyed.
    pub fn derived_font_ids(&self) -> Vec<FontId> {
        let mut ids = Vec::new();
        self.derived.borrow().collect_ids(&mut ids);
        ids
    }

    fn derive(
        self: &Arc<Self>,
        platform: PlatformFont,
        adjust: impl FnOnce(&mut Self),
    ) -> Arc<Self> {
        let mut font = Self::build(platform, self.is_custom, false);
        adjust(&mut font);
        Arc::new(font)
    }
}

impl fmt::Debug for SimpleFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleFont")
            .field("id", &self.id)
            .field("platform", &self.platform)
            .field("is_custom", &self.is_custom)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct DerivedFonts {
    small_caps: Option<Arc<SimpleFont>>,
    emphasis_mark: Option<Arc<SimpleFont>>,
    broken_ideograph: Option<Arc<SimpleFont>>,
    vertical_right: Option<Arc<SimpleFont>>,
    upright: Option<Arc<SimpleFont>>,
}

impl DerivedFonts {
    fn collect_ids(&self, ids: &mut Vec<FontId>) {
        for font in [
            &self.small_caps,
            &self.emphasis_mark,
            &self.broken_ideograph,
            &self.vertical_right,
            &self.upright,
        ]
        .into_iter()
        .flatten()
        {
            ids.push(font.id());
            font.derived.borrow().collect_ids(ids);
        }
    }
}

/// One codepoint range of a [`SegmentedFont`].
#[derive(Clone, Debug)]
pub struct FontRange {
    start: u32,
    end: u32,
    font: Arc<SimpleFont>,
}

impl FontRange {
    /// Creates a range covering `start..=end`.
    pub fn new(start: u32, end: u32, font: Arc<SimpleFont>) -> Self {
        Self { start, end, font }
    }

    /// Returns the first codepoint of the range.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Returns the last codepoint of the range, inclusive.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Returns the font serving this range.
    pub fn font(&self) -> &Arc<SimpleFont> {
        &self.font
    }
}

/// A composite font built from codepoint ranges, each served by its own
/// physical font.
#[derive(Debug)]
pub struct SegmentedFont {
    id: FontId,
    ranges: Vec<FontRange>,
}

impl SegmentedFont {
    /// Creates a segmented font from ordered ranges.
    pub fn new(ranges: Vec<FontRange>) -> Arc<Self> {
        Arc::new(Self {
            id: FontId::new(),
            ranges,
        })
    }

    /// Returns the unique identity of this font.
    pub fn id(&self) -> FontId {
        self.id
    }

    /// Returns the ordered ranges.
    pub fn ranges(&self) -> &[FontRange] {
        &self.ranges
    }

    /// Returns `true` if some range covers the given codepoint.
    pub fn contains_character(&self, codepoint: u32) -> bool {
        self.ranges
            .iter()
            .any(|r| r.start <= codepoint && codepoint <= r.end)
    }

    /// Returns the font serving the given codepoint. Falls back to the
    /// first range when no range matches.
    pub fn font_for_character(&self, codepoint: u32) -> Option<&Arc<SimpleFont>> {
        self.ranges
            .iter()
            .find(|r| r.start <= codepoint && codepoint <= r.end)
            .or_else(|| self.ranges.first())
            .map(|r| &r.font)
    }
}

/// A realized font: either one physical font or a segmented composite.
#[derive(Clone, Debug)]
pub enum RealizedFont {
    /// One physical font.
    Simple(Arc<SimpleFont>),
    /// An ordered list of codepoint ranges.
    Segmented(Arc<SegmentedFont>),
}

impl RealizedFont {
    /// Returns the unique identity of this font.
    pub fn id(&self) -> FontId {
        match self {
            Self::Simple(font) => font.id(),
            Self::Segmented(font) => font.id(),
        }
    }

    /// Returns the simple font if this is one.
    pub fn as_simple(&self) -> Option<&Arc<SimpleFont>> {
        match self {
            Self::Simple(font) => Some(font),
            Self::Segmented(_) => None,
        }
    }

    /// Returns the simple font serving the given codepoint.
    pub fn font_for_character(&self, codepoint: u32) -> Option<Arc<SimpleFont>> {
        match self {
            Self::Simple(font) => Some(font.clone()),
            Self::Segmented(font) => font.font_for_character(codepoint).cloned(),
        }
    }

    /// Returns `true` if this font can supply a glyph for the codepoint.
    pub fn contains_character(&self, codepoint: u32) -> bool {
        match self {
            Self::Simple(font) => font.glyph_for_char(codepoint).is_some(),
            Self::Segmented(font) => font.contains_character(codepoint),
        }
    }

    /// Returns `true` if this font came from a selector.
    pub fn is_custom(&self) -> bool {
        match self {
            Self::Simple(font) => font.is_custom(),
            Self::Segmented(font) => font.ranges().iter().any(|r| r.font().is_custom()),
        }
    }

    /// Returns `true` if any part of this font is still loading.
    pub fn is_loading(&self) -> bool {
        match self {
            Self::Simple(font) => font.is_loading(),
            Self::Segmented(font) => font.ranges().iter().any(|r| r.font().is_loading()),
        }
    }

    /// Returns the pitch classification. A segmented font with more than
    /// one range is always variable pitch.
    pub fn pitch(&self) -> Pitch {
        match self {
            Self::Simple(font) => font.pitch(),
            Self::Segmented(font) => match font.ranges() {
                [only] => only.font().pitch(),
                _ => Pitch::Variable,
            },
        }
    }
}
