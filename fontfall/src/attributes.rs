// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style attributes for describing and keying fonts.

use core::fmt;

/// Visual weight class of a font, typically on a scale from 1.0 to 1000.0.
///
/// In CSS, this corresponds to the `font-weight` property.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100.0);

    /// Weight value of 300.
    pub const LIGHT: Self = Self(300.0);

    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400.0);

    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500.0);

    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600.0);

    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);

    /// Weight value of 900.
    pub const BLACK: Self = Self(900.0);

    /// Creates a new weight value.
    pub const fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub const fn value(self) -> f32 {
        self.0
    }

    pub(crate) fn key_bits(self) -> u32 {
        self.0.to_bits()
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Visual style or "slope" of a font.
///
/// In CSS, this corresponds to the `font-style` property.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// A cursive style.
    Italic,
    /// A skewed style.
    Oblique,
}

impl FontStyle {
    /// Returns `true` for the italic and oblique styles.
    pub fn is_italic(self) -> bool {
        self != Self::Normal
    }
}

/// Glyph advance direction a font was instantiated for.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontOrientation {
    /// Glyphs advance horizontally.
    #[default]
    Horizontal,
    /// Glyphs advance vertically.
    Vertical,
}

/// Preferred treatment of non-CJK characters in vertical text.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum TextOrientation {
    /// Non-CJK characters are rendered rotated a quarter turn clockwise.
    #[default]
    VerticalRight,
    /// Non-CJK characters are rendered upright.
    Upright,
}

/// Width variant for fixed-pitch CJK forms.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontWidthVariant {
    /// Full width forms.
    #[default]
    Regular,
    /// Half width forms.
    Half,
    /// Third width forms.
    Third,
    /// Quarter width forms.
    Quarter,
}

/// Rendering mode requested when instantiating a platform font.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontRenderingMode {
    /// The platform's default rendering.
    #[default]
    Normal,
    /// An alternate mode, typically used for printing.
    Alternate,
}

/// A glyph shape transformation request, distinct from font fallback.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum FontVariant {
    /// Select the variant from the description (small caps when enabled
    /// and the character has an uppercase mapping).
    #[default]
    Auto,
    /// The plain glyph.
    Normal,
    /// The small capitals form.
    SmallCaps,
    /// The emphasis mark form.
    EmphasisMark,
    /// The square substitution glyph used for ideographs that a vertical
    /// font cannot render with vertical alternates.
    BrokenIdeograph,
}

/// Pitch classification of a realized font.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum Pitch {
    /// Not yet determined.
    #[default]
    Unknown,
    /// All glyphs share one advance width.
    Fixed,
    /// Glyph advances vary.
    Variable,
}
