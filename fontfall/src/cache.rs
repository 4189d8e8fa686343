// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font cache context object.
//!
//! Owns the platform lookup cache, the realized font cache with its
//! inactive pool, the glyph page arena, and the invalidation
//! generation. The embedder creates one cache and passes it by mutable
//! reference to every operation; nothing here is global.

use std::sync::{Arc, Weak};

use hashbrown::HashMap;

use super::data::{RealizedFont, SimpleFont};
use super::description::{FontDescription, FontDescriptionKey};
use super::page_tree::PageArena;
use super::platform::{FontSystem, PlatformFont, PlatformFontKey};
use super::selector::FontCacheClient;

/// Inactive realized fonts kept beyond this count trigger eviction.
const MAX_INACTIVE_FONTS: usize = 120;

/// Eviction removes oldest inactive fonts down to this count.
const TARGET_INACTIVE_FONTS: usize = 100;

/// Family aliases retried when a platform lookup misses, both
/// directions.
const FAMILY_ALIASES: &[(&str, &str)] = &[
    ("arial", "Helvetica"),
    ("helvetica", "Arial"),
    ("courier", "Courier New"),
    ("courier new", "Courier"),
    ("times", "Times New Roman"),
    ("times new roman", "Times"),
];

fn alternate_family(family: &str) -> Option<&'static str> {
    FAMILY_ALIASES
        .iter()
        .find(|(from, _)| family.eq_ignore_ascii_case(from))
        .map(|&(_, to)| to)
}

struct Entry {
    font: Arc<SimpleFont>,
    ref_count: u32,
}

/// Process-wide font caches and the page arena, as one explicit
/// context object.
#[derive(Debug)]
pub struct FontCache {
    system: Box<dyn FontSystem>,
    platform: HashMap<FontDescriptionKey, Option<Arc<PlatformFont>>>,
    realized: HashMap<PlatformFontKey, Entry>,
    /// Keys of refcount-zero realized fonts, oldest first.
    inactive: Vec<PlatformFontKey>,
    purging: bool,
    generation: u32,
    clients: Vec<Weak<dyn FontCacheClient>>,
    pages: PageArena,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("font", &self.font.id())
            .field("ref_count", &self.ref_count)
            .finish()
    }
}

impl FontCache {
    /// Creates a cache over the given platform font system.
    pub fn new(system: impl FontSystem + 'static) -> Self {
        Self {
            system: Box::new(system),
            platform: HashMap::new(),
            realized: HashMap::new(),
            inactive: Vec::new(),
            purging: false,
            generation: 0,
            clients: Vec::new(),
            pages: PageArena::new(),
        }
    }

    /// Returns the current invalidation generation.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns the glyph page arena.
    pub fn pages(&mut self) -> &mut PageArena {
        &mut self.pages
    }

    /// Registers a client to be notified on [`invalidate`].
    ///
    /// [`invalidate`]: Self::invalidate
    pub fn register_client(&mut self, client: Weak<dyn FontCacheClient>) {
        self.clients.push(client);
    }

    /// Returns the platform font for the given description and family,
    /// memoizing hits and misses alike.
    ///
    /// A first miss retries once under a well-known alias family; the
    /// alias result is cached under the original key too, so repeated
    /// lookups of an unavailable name stay negative without touching
    /// the platform.
    pub fn platform_font(
        &mut self,
        description: &FontDescription,
        family: &str,
    ) -> Option<Arc<PlatformFont>> {
        let key = FontDescriptionKey::new(description, family);
        if let Some(cached) = self.platform.get(&key) {
            return cached.clone();
        }
        let mut resolved = self.system.resolve(&key, family).map(Arc::new);
        if resolved.is_none() {
            if let Some(alias) = alternate_family(family) {
                let alias_key = key.with_family(alias);
                resolved = match self.platform.get(&alias_key) {
                    Some(cached) => cached.clone(),
                    None => {
                        let aliased = self.system.resolve(&alias_key, alias).map(Arc::new);
                        self.platform.insert(alias_key, aliased.clone());
                        aliased
                    }
                };
            }
        }
        self.platform.insert(key, resolved.clone());
        resolved
    }

    /// Resolves and realizes the font for one family entry.
    pub fn font_for_family(
        &mut self,
        description: &FontDescription,
        family: &str,
    ) -> Option<Arc<SimpleFont>> {
        let platform = self.platform_font(description, family)?;
        Some(self.acquire(&platform))
    }

    /// Realizes the given platform font, reusing the cached instance
    /// when one exists.
    ///
    /// Every call must be balanced by a [`release`].
    ///
    /// [`release`]: Self::release
    pub fn acquire(&mut self, platform: &PlatformFont) -> Arc<SimpleFont> {
        let key = platform.key();
        if let Some(entry) = self.realized.get_mut(&key) {
            entry.ref_count += 1;
            if entry.ref_count == 1 {
                self.inactive.retain(|inactive| *inactive != key);
            }
            return entry.font.clone();
        }
        let font = SimpleFont::new(platform.clone());
        self.realized.insert(
            key,
            Entry {
                font: font.clone(),
                ref_count: 1,
            },
        );
        font
    }

    /// Releases one reference to a realized font.
    ///
    /// A font whose last reference is released moves to the inactive
    /// pool; overflowing the pool evicts oldest entries first.
    pub fn release(&mut self, font: &SimpleFont) {
        let key = font.platform().key();
        let Some(entry) = self.realized.get_mut(&key) else {
            return;
        };
        if entry.ref_count == 0 {
            return;
        }
        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            self.inactive.push(key);
            if self.inactive.len() > MAX_INACTIVE_FONTS {
                self.purge_inactive(TARGET_INACTIVE_FONTS);
            }
        }
    }

    /// Evicts oldest inactive fonts until at most `target` remain,
    /// pruning their glyph pages and sweeping the platform cache of
    /// entries left without a realized font.
    pub fn purge_inactive(&mut self, target: usize) {
        if self.purging || self.inactive.len() <= target {
            return;
        }
        self.purging = true;
        let excess = self.inactive.len() - target;
        let mut doomed_fonts = Vec::with_capacity(excess);
        let mut doomed_ids = Vec::new();
        for key in self.inactive.drain(..excess) {
            if let Some(entry) = self.realized.remove(&key) {
                doomed_ids.push(entry.font.id());
                doomed_ids.extend(entry.font.derived_font_ids());
                doomed_fonts.push(entry.font);
            }
        }
        self.pages.prune(&doomed_ids);
        // Platform entries without a realized font are unreachable;
        // negative entries stay so misses remain memoized.
        let realized = &self.realized;
        self.platform.retain(|_, platform| match platform {
            Some(platform) => realized.contains_key(&platform.key()),
            None => true,
        });
        // Destroy outside the bookkeeping above.
        drop(doomed_fonts);
        self.purging = false;
    }

    /// Drops every cached platform lookup, bumps the generation,
    /// notifies registered clients, and purges inactive realized fonts.
    pub fn invalidate(&mut self) {
        self.platform.clear();
        self.generation += 1;
        // Snapshot first: notification handlers may register clients.
        let snapshot: Vec<_> = self.clients.iter().filter_map(Weak::upgrade).collect();
        self.clients.retain(|client| client.strong_count() > 0);
        for client in snapshot {
            client.font_cache_invalidated();
        }
        self.purge_inactive(0);
    }

    /// Tears down a selector-owned font, pruning the glyph pages of
    /// every simple font it contains and of their derived variants.
    ///
    /// Selector fonts never enter the realized cache, so generational
    /// invalidation cannot reclaim their pages.
    pub fn prune_custom_font(&mut self, font: &RealizedFont) {
        let mut ids = vec![font.id()];
        match font {
            RealizedFont::Simple(simple) => {
                ids.extend(simple.derived_font_ids());
            }
            RealizedFont::Segmented(segmented) => {
                for range in segmented.ranges() {
                    ids.push(range.font().id());
                    ids.extend(range.font().derived_font_ids());
                }
            }
        }
        self.pages.prune(&ids);
    }

    /// Asks the platform for a per-character substitute font and
    /// realizes it.
    pub fn system_fallback_for_character(
        &mut self,
        description: &FontDescription,
        original: Option<&SimpleFont>,
        is_platform_font: bool,
        codepoint: u32,
    ) -> Option<Arc<SimpleFont>> {
        let key = FontDescriptionKey::new(description, description.family_at(0).unwrap_or(""));
        let mut code_units = [0_u16; 2];
        let encoded = char::from_u32(codepoint)?.encode_utf16(&mut code_units);
        let platform =
            self.system
                .fallback_for_characters(&key, original, is_platform_font, encoded)?;
        Some(self.acquire(&platform))
    }

    /// Realizes the font used when no family entry resolves at all.
    pub fn last_resort_font(&mut self, description: &FontDescription) -> Option<Arc<SimpleFont>> {
        let key = FontDescriptionKey::new(description, description.family_at(0).unwrap_or(""));
        let platform = self.system.last_resort(&key)?;
        Some(self.acquire(&platform))
    }

    /// Returns the number of realized fonts currently cached.
    pub fn realized_count(&self) -> usize {
        self.realized.len()
    }

    /// Returns the number of realized fonts in the inactive pool.
    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::MemoryFontSystem;
    use crate::test_support::CoverageFace;

    fn system_with(families: &[&str]) -> MemoryFontSystem {
        let mut system = MemoryFontSystem::new();
        for family in families {
            system.register_face(CoverageFace::new(family, &[(0x20, 0x7E)]));
        }
        system
    }

    struct CountingSystem {
        inner: MemoryFontSystem,
        resolves: Rc<Cell<usize>>,
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
            self.inner
                .fallback_for_characters(key, original, is_platform_font, code_units)
        }

        fn last_resort(&self, key: &FontDescriptionKey) -> Option<PlatformFont> {
            self.inner.last_resort(key)
        }
    }

    #[test]
    fn negative_lookups_are_memoized() {
        let resolves = Rc::new(Cell::new(0));
        let mut cache = FontCache::new(CountingSystem {
            inner: system_with(&["Arial"]),
            resolves: resolves.clone(),
        });
        let description = FontDescription::new(["Nonexistent"], 16.0);
        assert!(cache.platform_font(&description, "Nonexistent").is_none());
        let after_first = resolves.get();
        assert!(cache.platform_font(&description, "Nonexistent").is_none());
        assert_eq!(resolves.get(), after_first);
        // Positive lookups stop calling the platform too.
        assert!(cache.platform_font(&description, "Arial").is_some());
        let after_hit = resolves.get();
        assert!(cache.platform_font(&description, "Arial").is_some());
        assert_eq!(resolves.get(), after_hit);
    }

    #[test]
    fn alias_resolves_missing_family() {
        let mut cache = FontCache::new(system_with(&["Helvetica"]));
        let description = FontDescription::new(["Arial"], 16.0);
        let arial = cache.platform_font(&description, "Arial").unwrap();
        let helvetica = cache.platform_font(&description, "Helvetica").unwrap();
        assert_eq!(arial.key(), helvetica.key());

        let mut cache = FontCache::new(system_with(&["Courier New"]));
        let description = FontDescription::new(["Courier"], 16.0);
        assert!(cache.platform_font(&description, "Courier").is_some());
    }

    #[test]
    fn acquire_release_drives_eviction_once() {
        let mut system = MemoryFontSystem::new();
        let mut platforms = Vec::new();
        for i in 0..(MAX_INACTIVE_FONTS + 1) {
            let face = CoverageFace::new(&format!("Family {i}"), &[(0x20, 0x7E)]);
            platforms.push(PlatformFont::new(face.clone(), 16.0));
            system.register_face(face);
        }
        let mut cache = FontCache::new(system);
        let fonts: Vec<_> = platforms
            .iter()
            .map(|platform| cache.acquire(platform))
            .collect();
        assert_eq!(cache.realized_count(), MAX_INACTIVE_FONTS + 1);
        assert_eq!(cache.inactive_count(), 0);
        for font in &fonts {
            cache.release(font);
        }
        // Crossing the cap evicts down to the target exactly once.
        assert_eq!(cache.inactive_count(), TARGET_INACTIVE_FONTS);
        assert_eq!(cache.realized_count(), TARGET_INACTIVE_FONTS);
    }

    #[test]
    fn reacquire_leaves_inactive_pool() {
        let mut cache = FontCache::new(system_with(&["Arial"]));
        let description = FontDescription::new(["Arial"], 16.0);
        let font = cache.font_for_family(&description, "Arial").unwrap();
        cache.release(&font);
        assert_eq!(cache.inactive_count(), 1);
        let again = cache.font_for_family(&description, "Arial").unwrap();
        assert_eq!(again.id(), font.id());
        assert_eq!(cache.inactive_count(), 0);
        cache.release(&again);
    }

    #[test]
    fn purge_sweeps_platform_cache_but_keeps_negative_entries() {
        let mut cache = FontCache::new(system_with(&["Arial"]));
        let description = FontDescription::new(["Arial"], 16.0);
        let font = cache.font_for_family(&description, "Arial").unwrap();
        assert!(cache.platform_font(&description, "Nonexistent").is_none());
        cache.release(&font);
        cache.purge_inactive(0);
        assert_eq!(cache.realized_count(), 0);
        // The negative entry survives; a repeat lookup is still a miss
        // answered from the cache.
        assert!(cache.platform.values().any(Option::is_none));
        assert!(!cache.platform.values().any(Option::is_some));
    }

    struct NotifyFlag {
        notified: Cell<bool>,
    }

    impl FontCacheClient for NotifyFlag {
        fn font_cache_invalidated(&self) {
            self.notified.set(true);
        }
    }

    #[test]
    fn invalidate_bumps_generation_and_notifies() {
        let mut cache = FontCache::new(system_with(&["Arial"]));
        let flag = Arc::new(NotifyFlag {
            notified: Cell::new(false),
        });
        let client: Arc<dyn FontCacheClient> = flag.clone();
        cache.register_client(Arc::downgrade(&client));
        let before = cache.generation();
        let description = FontDescription::new(["Arial"], 16.0);
        let font = cache.font_for_family(&description, "Arial").unwrap();
        cache.release(&font);
        cache.invalidate();
        assert!(cache.generation() > before);
        assert_eq!(cache.inactive_count(), 0);
        assert_eq!(cache.realized_count(), 0);
        assert!(flag.notified.get());
    }
}
