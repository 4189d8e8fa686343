// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External collaborators consulted during font resolution.

use super::data::RealizedFont;
use super::description::FontDescription;

/// Author-supplied font resolution, consulted before the platform
/// caches on every family scan.
///
/// An implementation typically backs `@font-face` style declarations;
/// fonts it returns are owned by the requesting fallback list rather
/// than shared through the realized font cache.
pub trait FontSelector {
    /// Returns the font the selector supplies for the given family, or
    /// `None` to defer to the platform.
    fn font_data(&self, description: &FontDescription, family: &str) -> Option<RealizedFont>;
}

/// Receiver of cache invalidation notifications.
///
/// Clients register with [`FontCache::register_client`] and are told
/// when every cached resolution they hold has gone stale.
///
/// [`FontCache::register_client`]: crate::FontCache::register_client
pub trait FontCacheClient {
    /// Called after the cache has been invalidated and its generation
    /// bumped.
    fn font_cache_invalidated(&self);
}
