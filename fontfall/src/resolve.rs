// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-character glyph resolution over a fallback list.

use super::attributes::{FontOrientation, FontVariant, TextOrientation};
use super::cache::FontCache;
use super::data::{RealizedFont, SimpleFont};
use super::description::FontDescription;
use super::fallback_list::FontFallbackList;
use super::glyph_page::{GlyphData, GlyphPage};
use super::page_tree::NodeId;
use super::unicode;
use std::sync::Arc;

impl FontFallbackList {
    /// Resolves one codepoint to a glyph and the font that supplies it.
    ///
    /// Walks the fallback chain page by page, applying variant and
    /// orientation substitution, then per-character system fallback.
    /// Returns `None` only when the platform owns no font at all; any
    /// other failure degrades to the primary font's missing glyph.
    pub fn glyph_for_char(
        &mut self,
        cache: &mut FontCache,
        description: &FontDescription,
        codepoint: u32,
        mirror: bool,
        variant: FontVariant,
    ) -> Option<GlyphData> {
        self.ensure_generation(cache);
        let mut c = codepoint;
        let mut variant = variant;
        if variant == FontVariant::Auto {
            variant = FontVariant::Normal;
            if description.small_caps() {
                let upper = unicode::uppercase(c);
                if upper != c {
                    c = upper;
                    variant = FontVariant::SmallCaps;
                }
            }
        }
        if mirror {
            c = unicode::mirrored(c);
        }
        let page_number = GlyphPage::number_for(c);

        let mut node = match self.page_node(page_number) {
            Some(node) => node,
            None => {
                let primary = self.font_data_at(cache, description, 0)?;
                let node = cache.pages().root(&primary, page_number);
                self.set_page_node(page_number, node);
                node
            }
        };

        // Walk the chain until a glyph is found or the system-fallback
        // leaf comes up empty.
        loop {
            if let Some(data) = cache.pages().glyph_data(node, c) {
                if variant == FontVariant::Normal {
                    if data.font.orientation() == FontOrientation::Horizontal
                        || data.font.is_text_orientation_fallback()
                    {
                        return Some(data);
                    }
                    return Some(vertical_adjusted(cache, description, c, page_number, data));
                }
                // Variant substitution happens against the owning
                // font's derived form and never joins system fallback.
                let Some(variant_font) = data.font.variant_font(variant) else {
                    return Some(data);
                };
                let variant_data = glyph_from_font(cache, page_number, c, &variant_font)
                    .unwrap_or_else(|| variant_font.missing_glyph_data());
                return Some(variant_data);
            }
            if cache.pages().is_system_fallback(node) {
                break;
            }
            let level = cache.pages().level(node);
            let next = self.font_data_at(cache, description, level + 1);
            let Some(deeper) = cache.pages().child(node, next.as_ref()) else {
                break;
            };
            node = deeper;
            self.set_page_node(page_number, node);
        }

        self.system_fallback(cache, description, c, page_number, node, variant)
    }

    fn system_fallback(
        &mut self,
        cache: &mut FontCache,
        description: &FontDescription,
        c: u32,
        page_number: u32,
        node: NodeId,
        variant: FontVariant,
    ) -> Option<GlyphData> {
        let original = self.primary_simple_font(cache, description);
        let for_platform_font = self.is_for_platform_font();
        let substitute = cache.system_fallback_for_character(
            description,
            original.as_deref(),
            for_platform_font,
            c,
        );
        let substitute = substitute.and_then(|font| {
            self.track_system_font(font.clone());
            let mut variant = variant;
            if font.orientation() == FontOrientation::Vertical
                && !font.has_vertical_glyphs()
                && unicode::is_cjk_ideograph_or_symbol(c)
            {
                variant = FontVariant::BrokenIdeograph;
            }
            match variant {
                FontVariant::Normal | FontVariant::Auto => Some(font),
                variant => font.variant_font(variant),
            }
        });
        if let Some(font) = substitute {
            let data = glyph_from_font(cache, page_number, c, &font)
                .unwrap_or_else(|| font.missing_glyph_data());
            if variant == FontVariant::Normal {
                cache.pages().cache_system_fallback(node, c, data.clone());
                if !unicode::is_cjk_ideograph_or_symbol(c)
                    && data.font.orientation() != FontOrientation::Horizontal
                    && !data.font.is_text_orientation_fallback()
                {
                    return Some(vertical_adjusted(cache, description, c, page_number, data));
                }
            }
            return Some(data);
        }
        // Even system fallback can fail; degrade to the primary font's
        // missing glyph.
        let primary = original.or_else(|| self.primary_simple_font(cache, description))?;
        let data = primary.missing_glyph_data();
        if variant == FontVariant::Normal {
            cache.pages().cache_system_fallback(node, c, data.clone());
        }
        Some(data)
    }
}

/// Looks up the glyph for `c` in the level-0 page of one font.
fn glyph_from_font(
    cache: &mut FontCache,
    page_number: u32,
    c: u32,
    font: &Arc<SimpleFont>,
) -> Option<GlyphData> {
    let realized = RealizedFont::Simple(font.clone());
    let node = cache.pages().root(&realized, page_number);
    cache.pages().glyph_data(node, c)
}

/// Resolves a glyph found in a vertical font: CJK falls back to the
/// broken-ideograph form when vertical alternates are missing, and
/// other characters follow the description's text orientation, chosen
/// by comparing glyph identity between the oriented and base forms.
fn vertical_adjusted(
    cache: &mut FontCache,
    description: &FontDescription,
    c: u32,
    page_number: u32,
    data: GlyphData,
) -> GlyphData {
    if unicode::is_cjk_ideograph_or_symbol(c) {
        if data.font.has_vertical_glyphs() {
            return data;
        }
        let broken = data.font.broken_ideograph_font();
        return glyph_from_font(cache, page_number, c, &broken)
            .unwrap_or_else(|| broken.missing_glyph_data());
    }
    match description.text_orientation() {
        TextOrientation::VerticalRight => {
            let oriented = data.font.vertical_right_orientation_font();
            match glyph_from_font(cache, page_number, c, &oriented) {
                // An identical glyph id means no vertical alternate is
                // baked in; render the horizontal glyph rotated.
                Some(oriented_data) if oriented_data.glyph == data.glyph => oriented_data,
                _ => data,
            }
        }
        TextOrientation::Upright => {
            let oriented = data.font.upright_orientation_font();
            match glyph_from_font(cache, page_number, c, &oriented) {
                // A distinct glyph id is a baked-in oriented alternate
                // that cannot stand upright; take the upright form's
                // horizontal glyph instead.
                Some(oriented_data) if oriented_data.glyph != data.glyph => oriented_data,
                _ => data,
            }
        }
    }
}
