// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end glyph resolution scenarios against an in-memory platform.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use fontfall::{
    Face, FaceId, FaceMetrics, FontCache, FontDescription, FontDescriptionKey, FontFallbackList,
    FontRange, FontSelector, FontSystem, FontVariant, MemoryFontSystem, PlatformFont,
    RealizedFont, SegmentedFont, SimpleFont,
};

/// Face with explicit coverage, enough for resolution tests.
struct TestFace {
    id: FaceId,
    name: String,
    ranges: Vec<(u32, u32)>,
}

impl TestFace {
    fn new(name: &str, ranges: &[(u32, u32)]) -> Arc<Self> {
        Arc::new(Self {
            id: FaceId::new(),
            name: name.into(),
            ranges: ranges.to_vec(),
        })
    }
}

impl Face for TestFace {
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
        false
    }

    fn is_fixed_pitch(&self) -> bool {
        false
    }
}

/// Counts the platform calls an inner registry receives.
struct CountingSystem {
    inner: MemoryFontSystem,
    resolves: Rc<Cell<usize>>,
    fallbacks: Rc<Cell<usize>>,
}

impl FontSystem for CountingSystem {
    fn resolve(&self, key: &FontDescriptionKey, family: &str) -> Option<PlatformFont> {
        self.resolves.set(self.resolves.get() + 1);
        self.inner.resolve(key, family)
    }

    fn fallback_for_characters(
        &self,
        key: &FontDescriptionKey,
        original: Option<&SimpleFont>,
        is_platform_font: bool,
        code_units: &[u16],
    ) -> Option<PlatformFont> {
        self.fallbacks.set(self.fallbacks.get() + 1);
        self.inner
            .fallback_for_characters(key, original, is_platform_font, code_units)
    }

    fn last_resort(&self, key: &FontDescriptionKey) -> Option<PlatformFont> {
        self.inner.last_resort(key)
    }
}

fn counting_cache(families: &[&str]) -> (FontCache, Rc<Cell<usize>>, Rc<Cell<usize>>) {
    let mut inner = MemoryFontSystem::new();
    for family in families {
        inner.register_face(TestFace::new(family, &[(0x20, 0x7E)]));
    }
    let resolves = Rc::new(Cell::new(0));
    let fallbacks = Rc::new(Cell::new(0));
    let cache = FontCache::new(CountingSystem {
        inner,
        resolves: resolves.clone(),
        fallbacks: fallbacks.clone(),
    });
    (cache, resolves, fallbacks)
}

fn family_of(data: &fontfall::GlyphData) -> &str {
    data.font.platform().face().family_name()
}

#[test]
fn two_family_scenario_prefers_first_installed() {
    let (mut cache, resolves, _) = counting_cache(&["Comic Sans MS", "Arial"]);
    let description = FontDescription::new(["Comic Sans MS", "Arial"], 16.0);
    let mut list = FontFallbackList::new();
    let data = list
        .glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
        .expect("a registered family must resolve");
    assert_eq!(family_of(&data), "Comic Sans MS");
    assert!((data.font.platform().size() - 16.0).abs() < 1e-6);

    // The identical second lookup is answered from the glyph page with
    // zero platform calls.
    let calls = resolves.get();
    let again = list
        .glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
        .expect("cached lookup must still resolve");
    assert_eq!(again.glyph, data.glyph);
    assert_eq!(again.font.id(), data.font.id());
    assert_eq!(resolves.get(), calls, "second lookup must not hit the platform");
}

#[test]
fn two_family_scenario_falls_back_when_first_missing() {
    let (mut cache, _, _) = counting_cache(&["Arial"]);
    let description = FontDescription::new(["Comic Sans MS", "Arial"], 16.0);
    let mut list = FontFallbackList::new();
    let data = list
        .glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
        .expect("the second family must resolve");
    assert_eq!(family_of(&data), "Arial");
}

#[test]
fn system_fallback_is_consulted_once_per_character() {
    let mut inner = MemoryFontSystem::new();
    inner.register_face(TestFace::new("Latin", &[(0x20, 0x7E)]));
    inner.register_face(TestFace::new("CJK", &[(0x4E00, 0x9FFF)]));
    let fallbacks = Rc::new(Cell::new(0));
    let mut cache = FontCache::new(CountingSystem {
        inner,
        resolves: Rc::new(Cell::new(0)),
        fallbacks: fallbacks.clone(),
    });
    let description = FontDescription::new(["Latin"], 16.0);
    let mut list = FontFallbackList::new();
    let first = list
        .glyph_for_char(&mut cache, &description, 0x4E2D, false, FontVariant::Auto)
        .expect("system fallback must supply the glyph");
    assert_eq!(family_of(&first), "CJK");
    assert_eq!(fallbacks.get(), 1);
    let second = list
        .glyph_for_char(&mut cache, &description, 0x4E2D, false, FontVariant::Auto)
        .expect("cached system fallback must resolve");
    assert_eq!(second.font.id(), first.font.id());
    assert_eq!(fallbacks.get(), 1, "repeat lookups must reuse the cached page");
}

#[test]
fn invalidation_rescans_from_the_first_family() {
    let (mut cache, resolves, _) = counting_cache(&["Arial"]);
    let description = FontDescription::new(["Nonexistent", "Arial"], 16.0);
    let mut list = FontFallbackList::new();
    let data = list
        .glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
        .expect("the second family must resolve");
    assert_eq!(family_of(&data), "Arial");
    let generation = cache.generation();
    let calls = resolves.get();

    cache.invalidate();
    assert!(cache.generation() > generation, "generation must strictly increase");

    // The stale list rebuilds: the unresolvable first family is tried
    // against the platform again because its negative entry is gone.
    let rebuilt = list
        .glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
        .expect("resolution must survive invalidation");
    assert_eq!(family_of(&rebuilt), "Arial");
    assert!(
        resolves.get() > calls,
        "the rebuilt list must rescan instead of reusing stale entries"
    );
}

#[test]
fn alias_substitutes_a_missing_family() {
    let (mut cache, _, _) = counting_cache(&["Helvetica"]);
    let description = FontDescription::new(["Arial"], 16.0);
    let mut list = FontFallbackList::new();
    let data = list
        .glyph_for_char(&mut cache, &description, 'A' as u32, false, FontVariant::Auto)
        .expect("the alias family must resolve");
    assert_eq!(family_of(&data), "Helvetica");
}

#[test]
fn selector_font_serves_its_ranges() {
    struct SegmentedSelector(Arc<SegmentedFont>);

    impl FontSelector for SegmentedSelector {
        fn font_data(
            &self,
            _description: &FontDescription,
            family: &str,
        ) -> Option<RealizedFont> {
            family
                .eq_ignore_ascii_case("Stitched")
                .then(|| RealizedFont::Segmented(self.0.clone()))
        }
    }

    let upper = SimpleFont::new_custom(
        PlatformFont::new(TestFace::new("Upper", &[(0x41, 0x5A)]), 16.0),
        false,
    );
    let lower = SimpleFont::new_custom(
        PlatformFont::new(TestFace::new("Lower", &[(0x61, 0x7A)]), 16.0),
        false,
    );
    let segmented = SegmentedFont::new(vec![
        FontRange::new(0x41, 0x5A, upper.clone()),
        FontRange::new(0x61, 0x7A, lower.clone()),
    ]);

    let mut inner = MemoryFontSystem::new();
    inner.register_face(TestFace::new("Fallback", &[(0x20, 0x7E)]));
    let mut cache = FontCache::new(inner);
    let description = FontDescription::new(["Stitched", "Fallback"], 16.0);
    let mut list = FontFallbackList::with_selector(Rc::new(SegmentedSelector(segmented)));

    let m = list
        .glyph_for_char(&mut cache, &description, 'M' as u32, false, FontVariant::Auto)
        .expect("the selector font must resolve");
    assert_eq!(m.font.id(), upper.id());
    let lowercase = list
        .glyph_for_char(&mut cache, &description, 'm' as u32, false, FontVariant::Auto)
        .expect("the selector font must resolve");
    assert_eq!(lowercase.font.id(), lower.id());
    // A digit is outside every range; the next family takes over.
    let digit = list
        .glyph_for_char(&mut cache, &description, '1' as u32, false, FontVariant::Auto)
        .expect("the platform family must resolve");
    assert_eq!(family_of(&digit), "Fallback");
}

#[test]
fn every_scalar_resolves_to_some_glyph() {
    let (mut cache, _, _) = counting_cache(&["Latin"]);
    let description = FontDescription::new(["Latin"], 16.0);
    let mut list = FontFallbackList::new();
    let primary = list
        .primary_simple_font(&mut cache, &description)
        .expect("primary font must exist");
    for codepoint in ['A' as u32, 0x0416, 0x4E2D, 0x1F600] {
        let data = list
            .glyph_for_char(&mut cache, &description, codepoint, false, FontVariant::Auto)
            .expect("resolution must never fail while a font is installed");
        if codepoint > 0x7E {
            assert_eq!(data.glyph, 0, "uncovered characters must get the placeholder");
            assert_eq!(
                data.font.id(),
                primary.id(),
                "the placeholder must come from the primary font"
            );
        }
    }
}
