// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic faces for unit tests.

use std::sync::Arc;

use super::data::SimpleFont;
use super::face::{Face, FaceId, FaceMetrics};
use super::platform::PlatformFont;

/// Face with explicit codepoint coverage and flat metrics.
pub(crate) struct CoverageFace {
    id: FaceId,
    name: String,
    ranges: Vec<(u32, u32)>,
    fixed_pitch: bool,
    vertical_glyphs: bool,
}

impl CoverageFace {
    pub(crate) fn new(name: &str, ranges: &[(u32, u32)]) -> Arc<Self> {
        Arc::new(Self {
            id: FaceId::new(),
            name: name.into(),
            ranges: ranges.to_vec(),
            fixed_pitch: false,
            vertical_glyphs: false,
        })
    }

    pub(crate) fn fixed_pitch(name: &str, ranges: &[(u32, u32)]) -> Arc<Self> {
        Arc::new(Self {
            id: FaceId::new(),
            name: name.into(),
            ranges: ranges.to_vec(),
            fixed_pitch: true,
            vertical_glyphs: false,
        })
    }

    pub(crate) fn with_vertical_glyphs(name: &str, ranges: &[(u32, u32)]) -> Arc<Self> {
        Arc::new(Self {
            id: FaceId::new(),
            name: name.into(),
            ranges: ranges.to_vec(),
            fixed_pitch: false,
            vertical_glyphs: true,
        })
    }
}

impl Face for CoverageFace {
    fn id(&self) -> FaceId {
        self.id
    }

    fn family_name(&self) -> &str {
        &self.name
    }

    fn metrics(&self) -> FaceMetrics {
        FaceMetrics {
            units_per_em: 1000,
            ascent: 800,
            descent: -200,
            line_gap: 0,
            x_height: Some(500),
            avg_char_width: Some(500),
            max_char_width: Some(1000),
        }
    }

    fn glyph_for_char(&self, codepoint: u32) -> Option<u16> {
        self.ranges
            .iter()
            .any(|&(start, end)| start <= codepoint && codepoint <= end)
            .then(|| (codepoint % 0xFFFE + 1) as u16)
    }

    fn advance_for_glyph(&self, _glyph: u16) -> f32 {
        500.0
    }

    fn has_vertical_glyphs(&self) -> bool {
        self.vertical_glyphs
    }

    fn is_fixed_pitch(&self) -> bool {
        self.fixed_pitch
    }
}

/// Realizes a [`CoverageFace`] at 16px.
pub(crate) fn simple_font(name: &str, ranges: &[(u32, u32)]) -> Arc<SimpleFont> {
    SimpleFont::new(PlatformFont::new(CoverageFace::new(name, ranges), 16.0))
}
