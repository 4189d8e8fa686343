// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-text-run fallback state: the ordered realized fonts of one
//! family list.

use std::rc::Rc;
use std::sync::Arc;

use hashbrown::HashMap;

use super::attributes::Pitch;
use super::cache::FontCache;
use super::data::{RealizedFont, SimpleFont};
use super::description::FontDescription;
use super::page_tree::NodeId;
use super::selector::FontSelector;

/// Family scan cursor value once every family entry has been tried.
const ALL_FAMILIES_SCANNED: usize = usize::MAX;

/// Lazily realized fonts for one family list, in list order.
///
/// One instance belongs to one styled text run. All state is validated
/// against the cache generation on every access and rebuilt from
/// scratch after an invalidation.
pub struct FontFallbackList {
    fonts: Vec<RealizedFont>,
    family_index: usize,
    pitch: Option<Pitch>,
    cached_primary: Option<Arc<SimpleFont>>,
    generation: Option<u32>,
    page_zero: Option<NodeId>,
    pages: HashMap<u32, NodeId>,
    loading_custom_fonts: bool,
    selector: Option<Rc<dyn FontSelector>>,
    for_platform_font: bool,
    system_fonts: Vec<Arc<SimpleFont>>,
}

impl FontFallbackList {
    /// Creates an empty fallback list with no selector.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            fonts: Vec::new(),
            family_index: 0,
            pitch: None,
            cached_primary: None,
            generation: None,
            page_zero: None,
            pages: HashMap::new(),
            loading_custom_fonts: false,
            selector: None,
            for_platform_font: false,
            system_fonts: Vec::new(),
        }
    }

    /// Creates an empty fallback list that consults the given selector
    /// before the platform on every family scan.
    pub fn with_selector(selector: Rc<dyn FontSelector>) -> Self {
        let mut list = Self::new();
        list.selector = Some(selector);
        list
    }

    /// Marks this list as backing a font constructed directly from
    /// platform data, which system fallback may treat differently.
    pub fn set_for_platform_font(&mut self, for_platform_font: bool) {
        self.for_platform_font = for_platform_font;
    }

    /// Returns `true` if a selector font in this list is still loading.
    pub fn loading_custom_fonts(&self) -> bool {
        self.loading_custom_fonts
    }

    pub(crate) fn is_for_platform_font(&self) -> bool {
        self.for_platform_font
    }

    pub(crate) fn page_node(&self, page_number: u32) -> Option<NodeId> {
        if page_number == 0 {
            self.page_zero
        } else {
            self.pages.get(&page_number).copied()
        }
    }

    pub(crate) fn set_page_node(&mut self, page_number: u32, node: NodeId) {
        if page_number == 0 {
            self.page_zero = Some(node);
        } else {
            self.pages.insert(page_number, node);
        }
    }

    pub(crate) fn track_system_font(&mut self, font: Arc<SimpleFont>) {
        self.system_fonts.push(font);
    }

    /// Discards everything and adopts the cache's current generation
    /// and the given selector.
    ///
    /// Shared fonts are released back to the cache; selector-owned
    /// fonts are torn down outright, pruning their glyph pages.
    pub fn invalidate(&mut self, cache: &mut FontCache, selector: Option<Rc<dyn FontSelector>>) {
        for font in self.fonts.drain(..) {
            if font.is_custom() {
                cache.prune_custom_font(&font);
            } else if let RealizedFont::Simple(simple) = &font {
                cache.release(simple);
            }
        }
        for font in self.system_fonts.drain(..) {
            cache.release(&font);
        }
        self.family_index = 0;
        self.pitch = None;
        self.cached_primary = None;
        self.page_zero = None;
        self.pages.clear();
        self.loading_custom_fonts = false;
        self.selector = selector;
        self.generation = Some(cache.generation());
    }

    pub(crate) fn ensure_generation(&mut self, cache: &mut FontCache) {
        if self.generation != Some(cache.generation()) {
            let selector = self.selector.clone();
            self.invalidate(cache, selector);
        }
    }

    /// Returns the realized font for the given fallback level, scanning
    /// further down the family list on demand.
    ///
    /// `None` means the list is exhausted. Level 0 falls back to the
    /// platform's last resort font when no family entry resolves.
    pub fn font_data_at(
        &mut self,
        cache: &mut FontCache,
        description: &FontDescription,
        index: usize,
    ) -> Option<RealizedFont> {
        self.ensure_generation(cache);
        while self.fonts.len() <= index && self.family_index != ALL_FAMILIES_SCANNED {
            match self.realize_next(cache, description) {
                Some(font) => self.fonts.push(font),
                None => {
                    self.family_index = ALL_FAMILIES_SCANNED;
                    if self.fonts.is_empty() {
                        if let Some(last) = cache.last_resort_font(description) {
                            self.fonts.push(RealizedFont::Simple(last));
                        }
                    }
                }
            }
        }
        self.fonts.get(index).cloned()
    }

    fn realize_next(
        &mut self,
        cache: &mut FontCache,
        description: &FontDescription,
    ) -> Option<RealizedFont> {
        while self.family_index < description.family_count() {
            let family = description.family_at(self.family_index)?;
            self.family_index += 1;
            if let Some(selector) = self.selector.clone() {
                if let Some(font) = selector.font_data(description, family) {
                    if font.is_loading() {
                        self.loading_custom_fonts = true;
                    }
                    return Some(font);
                }
            }
            if let Some(font) = cache.font_for_family(description, family) {
                return Some(RealizedFont::Simple(font));
            }
        }
        None
    }

    /// Returns the simple font that renders the space character of the
    /// primary fallback level.
    pub fn primary_simple_font(
        &mut self,
        cache: &mut FontCache,
        description: &FontDescription,
    ) -> Option<Arc<SimpleFont>> {
        self.ensure_generation(cache);
        if let Some(font) = &self.cached_primary {
            return Some(font.clone());
        }
        let primary = self.font_data_at(cache, description, 0)?;
        let font = primary.font_for_character(' ' as u32)?;
        self.cached_primary = Some(font.clone());
        Some(font)
    }

    /// Classifies the primary font as fixed or variable pitch, caching
    /// the answer.
    pub fn determine_pitch(
        &mut self,
        cache: &mut FontCache,
        description: &FontDescription,
    ) -> Pitch {
        self.ensure_generation(cache);
        if let Some(pitch) = self.pitch {
            return pitch;
        }
        let pitch = match self.font_data_at(cache, description, 0) {
            Some(font) => font.pitch(),
            None => Pitch::Unknown,
        };
        self.pitch = Some(pitch);
        pitch
    }
}

impl core::fmt::Debug for FontFallbackList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontFallbackList")
            .field("fonts", &self.fonts.len())
            .field("family_index", &self.family_index)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
