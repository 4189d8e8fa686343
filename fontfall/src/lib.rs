// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font glyph resolution, per-character fallback, and caching.
//!
//! The entry points are [`FontCache`], the context object owning every
//! process-wide cache, and [`FontFallbackList`], the per-text-run state
//! that resolves characters to glyphs through an ordered family list:
//!
//! ```
//! use fontfall::{FontCache, FontDescription, FontFallbackList, FontVariant, MemoryFontSystem};
//!
//! let mut system = MemoryFontSystem::new();
//! // Bundled fonts are registered from raw data or a file path.
//! // system.register_file("fonts/NotoSans-Regular.ttf");
//! let mut cache = FontCache::new(system);
//!
//! let description = FontDescription::new(["Comic Sans MS", "Arial"], 16.0);
//! let mut list = FontFallbackList::new();
//! if let Some(data) =
//!     list.glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
//! {
//!     let _ = (data.glyph, data.font);
//! }
//! ```
//!
//! Failures never surface as errors: an unresolvable family degrades to
//! the next entry, an uncovered character to per-character system
//! fallback, and ultimately to the primary font's missing glyph.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET

mod attributes;
mod backend;
mod cache;
mod data;
mod description;
mod face;
mod fallback_list;
mod glyph_page;
mod page_tree;
mod platform;
mod resolve;
mod selector;
mod unicode;

#[cfg(test)]
pub(crate) mod test_support;

pub use linebender_resource_handle::Blob;

pub use attributes::{
    FontOrientation, FontRenderingMode, FontStyle, FontVariant, FontWeight, FontWidthVariant,
    Pitch, TextOrientation,
};
pub use backend::MemoryFontSystem;
pub use cache::FontCache;
pub use data::{FontId, FontMetrics, FontRange, RealizedFont, SegmentedFont, SimpleFont};
pub use description::{FontDescription, FontDescriptionKey};
pub use face::{Face, FaceId, FaceMetrics, OpenTypeFace};
pub use fallback_list::FontFallbackList;
pub use glyph_page::{GlyphData, GlyphPage};
pub use page_tree::{NodeId, PageArena, PageState};
pub use platform::{FontSystem, PlatformFont, PlatformFontKey};
pub use selector::{FontCacheClient, FontSelector};
pub use unicode::{is_cjk_ideograph_or_symbol, mirrored, uppercase};
