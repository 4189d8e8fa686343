// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-size blocks mapping codepoints to glyphs at one fallback
//! level.

use core::fmt;
use std::sync::Arc;

use super::data::{RealizedFont, SimpleFont};

/// A glyph resolved for one codepoint, together with the font that owns
/// it.
#[derive(Clone, Debug)]
pub struct GlyphData {
    /// The glyph identifier.
    pub glyph: u16,
    /// The font the glyph belongs to.
    pub font: Arc<SimpleFont>,
}

/// A block of [`GlyphPage::SIZE`] codepoints resolved against the fonts
/// of one fallback chain prefix.
///
/// An unset slot means the codepoint has not resolved at this fallback
/// level or any level above it.
#[derive(Clone)]
pub struct GlyphPage {
    slots: Vec<Option<GlyphData>>,
    filled: usize,
}

impl Default for GlyphPage {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphPage {
    /// Number of codepoints covered by one page.
    pub const SIZE: u32 = 256;

    /// Returns the page number covering the given codepoint.
    pub fn number_for(codepoint: u32) -> u32 {
        codepoint / Self::SIZE
    }

    /// Returns the first codepoint of the given page.
    pub fn base(page_number: u32) -> u32 {
        page_number * Self::SIZE
    }

    /// Creates a page with every slot unset.
    pub fn new() -> Self {
        Self {
            slots: vec![None; Self::SIZE as usize],
            filled: 0,
        }
    }

    /// Returns the resolved glyph for the given codepoint, if any.
    pub fn glyph_data_for(&self, codepoint: u32) -> Option<GlyphData> {
        self.slots[(codepoint % Self::SIZE) as usize].clone()
    }

    /// Records the resolved glyph for the given codepoint.
    pub fn set(&mut self, codepoint: u32, data: GlyphData) {
        let slot = &mut self.slots[(codepoint % Self::SIZE) as usize];
        if slot.is_none() {
            self.filled += 1;
        }
        *slot = Some(data);
    }

    /// Returns the number of resolved slots.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Resolves every slot left unset by `parent` against `font`.
    ///
    /// Returns `None` when the result would have no resolved slots at
    /// all.
    pub fn fill(
        parent: Option<&GlyphPage>,
        page_number: u32,
        font: &RealizedFont,
    ) -> Option<GlyphPage> {
        let mut page = parent.cloned().unwrap_or_else(Self::new);
        let base = Self::base(page_number);
        for index in 0..Self::SIZE {
            let slot = &mut page.slots[index as usize];
            if slot.is_some() {
                continue;
            }
            let codepoint = base + index;
            if !font.contains_character(codepoint) {
                continue;
            }
            let Some(owner) = font.font_for_character(codepoint) else {
                continue;
            };
            if let Some(glyph) = owner.glyph_for_char(codepoint) {
                *slot = Some(GlyphData { glyph, font: owner });
                page.filled += 1;
            }
        }
        (page.filled > 0).then_some(page)
    }
}

impl fmt::Debug for GlyphPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphPage")
            .field("filled", &self.filled)
            .finish_non_exhaustive()
    }
}
