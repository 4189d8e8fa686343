// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interface to concrete glyph sources.
//!
//! Platform specific font handles vary wildly; everything this library
//! needs from one is captured by the [`Face`] trait so that backends can
//! be swapped at construction time. [`OpenTypeFace`] is the bundled
//! implementation for raw OpenType data.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use read_fonts::{
    tables::cmap::{Cmap, CmapSubtable},
    types::GlyphId,
    FontData, FontRead, FontRef, TableProvider, TopLevelTable,
};

use super::Blob;

/// Unique identifier for a [`Face`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(transparent)]
pub struct FaceId(u64);

impl FaceId {
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

/// Design-space metrics of a face, in font units.
#[derive(Copy, Clone, Debug)]
pub struct FaceMetrics {
    /// Units per em; the divisor for converting font units to pixels.
    pub units_per_em: u16,
    /// Distance from the baseline to the top of the em box.
    pub ascent: i16,
    /// Distance from the baseline to the bottom of the em box,
    /// typically negative.
    pub descent: i16,
    /// Recommended additional spacing between lines.
    pub line_gap: i16,
    /// Height of the lowercase `x`.
    pub x_height: Option<i16>,
    /// Average advance width over all characters.
    pub avg_char_width: Option<i16>,
    /// Maximum advance width over all characters.
    pub max_char_width: Option<i16>,
}

/// A concrete source of glyphs: one face of one installed or embedded
/// font, independent of size.
///
/// Metric queries are pure and side-effect free.
pub trait Face {
    /// Returns the unique identity of this face.
    fn id(&self) -> FaceId;

    /// Returns the family name this face was registered or enumerated
    /// under.
    fn family_name(&self) -> &str;

    /// Returns the design-space metrics.
    fn metrics(&self) -> FaceMetrics;

    /// Returns the nominal glyph for the given codepoint, if the face
    /// covers it.
    fn glyph_for_char(&self, codepoint: u32) -> Option<u16>;

    /// Returns the advance width for the given glyph, in font units.
    fn advance_for_glyph(&self, glyph: u16) -> f32;

    /// Returns `true` if the face carries vertical glyph metrics or
    /// alternates.
    fn has_vertical_glyphs(&self) -> bool;

    /// Returns `true` if all glyphs share one advance width.
    fn is_fixed_pitch(&self) -> bool;
}

impl fmt::Debug for dyn Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("id", &self.id())
            .field("family_name", &self.family_name())
            .finish()
    }
}

/// [`Face`] implementation over raw OpenType data.
pub struct OpenTypeFace {
    id: FaceId,
    family_name: Arc<str>,
    data: Blob<u8>,
    index: u32,
    charmap: CharmapIndex,
    metrics: FaceMetrics,
    has_vertical_glyphs: bool,
    is_fixed_pitch: bool,
}

impl OpenTypeFace {
    /// Creates a face from font data and a collection index.
    ///
    /// Returns `None` if the data cannot be parsed or has no usable
    /// character map.
    pub fn new(family_name: &str, data: Blob<u8>, index: u32) -> Option<Self> {
        let font = FontRef::from_index(data.as_ref(), index).ok()?;
        let charmap = CharmapIndex::new(&font)?;
        let metrics = read_metrics(&font)?;
        let has_vertical_glyphs = font.vhea().is_ok();
        let is_fixed_pitch = font
            .post()
            .map(|post| post.is_fixed_pitch() != 0)
            .unwrap_or(false);
        Some(Self {
            id: FaceId::new(),
            family_name: family_name.into(),
            data,
            index,
            charmap,
            metrics,
            has_vertical_glyphs,
            is_fixed_pitch,
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> &Blob<u8> {
        &self.data
    }

    /// Returns the index of the face in a collection (`ttc`) file.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Face for OpenTypeFace {
    fn id(&self) -> FaceId {
        self.id
    }

    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn glyph_for_char(&self, codepoint: u32) -> Option<u16> {
        self.charmap
            .map(self.data.as_ref(), codepoint)
            .map(|gid| gid as u16)
    }

    fn advance_for_glyph(&self, glyph: u16) -> f32 {
        let Ok(font) = FontRef::from_index(self.data.as_ref(), self.index) else {
            return 0.0;
        };
        let Ok(hmtx) = font.hmtx() else {
            return 0.0;
        };
        let metrics = hmtx.h_metrics();
        // Glyphs beyond numberOfHMetrics share the last recorded advance.
        metrics
            .get(glyph as usize)
            .or_else(|| metrics.last())
            .map(|m| m.advance() as f32)
            .unwrap_or(0.0)
    }

    fn has_vertical_glyphs(&self) -> bool {
        self.has_vertical_glyphs
    }

    fn is_fixed_pitch(&self) -> bool {
        self.is_fixed_pitch
    }
}

impl fmt::Debug for OpenTypeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenTypeFace")
            .field("id", &self.id)
            .field("family_name", &self.family_name)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Location of the best cmap subtable, so lookups can re-read it
/// without holding a borrow of the font data.
#[derive(Copy, Clone, Debug)]
struct CharmapIndex {
    subtable_offset: u32,
    is_symbol: bool,
}

impl CharmapIndex {
    fn new(font: &FontRef<'_>) -> Option<Self> {
        let cmap = font.cmap().ok()?;
        let cmap_offset = font
            .table_directory()
            .table_records()
            .iter()
            .find(|rec| rec.tag() == Cmap::TAG)
            .map(|rec| rec.offset())?;
        let (_, rec, _) = cmap.best_subtable()?;
        let subtable_offset = cmap_offset.checked_add(rec.subtable_offset().to_u32())?;
        Some(Self {
            subtable_offset,
            is_symbol: rec.is_symbol(),
        })
    }

    fn map(&self, font_data: &[u8], codepoint: u32) -> Option<u32> {
        let subtable_data = font_data.get(self.subtable_offset as usize..)?;
        let subtable = CmapSubtable::read(FontData::new(subtable_data)).ok()?;
        let result = map_in_subtable(&subtable, codepoint);
        if result.is_none() && self.is_symbol && codepoint <= 0x00FF {
            // Symbol encoded fonts duplicate U+F000..F0FF at
            // U+0000..U+00FF, matching Windows behavior.
            return map_in_subtable(&subtable, 0xF000 + codepoint).map(|gid| gid.to_u32());
        }
        result.map(|gid| gid.to_u32())
    }
}

fn map_in_subtable(subtable: &CmapSubtable<'_>, c: u32) -> Option<GlyphId> {
    match subtable {
        CmapSubtable::Format0(table) => table.map_codepoint(c),
        CmapSubtable::Format4(table) => table.map_codepoint(c),
        CmapSubtable::Format6(table) => table.map_codepoint(c),
        CmapSubtable::Format10(table) => {
            let index = c.checked_sub(table.start_char_code())?;
            table
                .glyph_id_array()
                .get(index as usize)
                .map(|gid| GlyphId::from(gid.get()))
        }
        CmapSubtable::Format12(table) => table.map_codepoint(c),
        CmapSubtable::Format13(table) => table.map_codepoint(c),
        _ => None,
    }
}

fn read_metrics(font: &FontRef<'_>) -> Option<FaceMetrics> {
    let head = font.head().ok()?;
    let units_per_em = head.units_per_em();
    let hhea = font.hhea().ok()?;
    let os2 = font.os2().ok();
    let x_height = os2.as_ref().and_then(|os2| os2.sx_height());
    let avg_char_width = os2.as_ref().map(|os2| os2.x_avg_char_width());
    let max_char_width = Some(head.x_max().saturating_sub(head.x_min()));
    Some(FaceMetrics {
        units_per_em,
        ascent: hhea.ascender().to_i16(),
        descent: hhea.descender().to_i16(),
        line_gap: hhea.line_gap().to_i16(),
        x_height,
        avg_char_width,
        max_char_width,
    })
}
