// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory [`FontSystem`] backed by a registry of named faces.
//!
//! Serves both as the embedder path for bundled fonts and as the
//! backend used by the test suite.

use core::fmt;
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;

use read_fonts::{
    types::NameId,
    FileRef, FontRef, TableProvider,
};

use super::data::SimpleFont;
use super::description::FontDescriptionKey;
use super::face::{Face, OpenTypeFace};
use super::platform::{FontSystem, PlatformFont};
use super::Blob;

/// A [`FontSystem`] whose fonts are registered explicitly rather than
/// enumerated from the host.
///
/// Family lookup is case-insensitive. Per-character fallback scans
/// faces in registration order and the first registered face doubles as
/// the last resort.
#[derive(Default)]
pub struct MemoryFontSystem {
    faces: Vec<Arc<dyn Face>>,
    by_name: HashMap<String, usize>,
}

impl MemoryFontSystem {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no face has been registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Registers a face under its own family name.
    pub fn register_face(&mut self, face: Arc<dyn Face>) {
        let name = face.family_name().to_lowercase();
        let index = self.faces.len();
        self.faces.push(face);
        self.by_name.entry(name).or_insert(index);
    }

    /// Registers every face found in raw font data, single fonts and
    /// collections alike. Family names come from the name table.
    ///
    /// Returns the number of faces registered.
    pub fn register_fonts(&mut self, data: Blob<u8>) -> usize {
        let mut registered = 0;
        let count = match FileRef::new(data.as_ref()) {
            Ok(FileRef::Font(_)) => 1,
            Ok(FileRef::Collection(collection)) => collection.len(),
            Err(_) => 0,
        };
        for index in 0..count {
            let Ok(font) = FontRef::from_index(data.as_ref(), index) else {
                continue;
            };
            let Some(family) = family_name(&font) else {
                continue;
            };
            if let Some(face) = OpenTypeFace::new(&family, data.clone(), index) {
                self.register_face(Arc::new(face));
                registered += 1;
            }
        }
        registered
    }

    /// Registers every face found in the file at `path`.
    ///
    /// Returns the number of faces registered; 0 when the file cannot
    /// be read or parsed.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> usize {
        match std::fs::read(path) {
            Ok(bytes) => self.register_fonts(Blob::new(Arc::new(bytes))),
            Err(_) => 0,
        }
    }

    fn face_for_family(&self, family: &str) -> Option<&Arc<dyn Face>> {
        self.by_name
            .get(&family.to_lowercase())
            .map(|&index| &self.faces[index])
    }

    fn instantiate(&self, key: &FontDescriptionKey, face: &Arc<dyn Face>) -> PlatformFont {
        PlatformFont::new(face.clone(), key.size() as f32)
            .with_synthetics(false, key.style().is_italic())
            .with_orientation(key.orientation())
            .with_width_variant(key.width_variant())
    }
}

impl FontSystem for MemoryFontSystem {
    fn resolve(&self, key: &FontDescriptionKey, family: &str) -> Option<PlatformFont> {
        let face = self.face_for_family(family)?;
        Some(self.instantiate(key, face))
    }

    fn fallback_for_characters(
        &self,
        key: &FontDescriptionKey,
        _original: Option<&SimpleFont>,
        _is_platform_font: bool,
        code_units: &[u16],
    ) -> Option<PlatformFont> {
        let codepoint = char::decode_utf16(code_units.iter().copied())
            .next()?
            .ok()? as u32;
        let face = self
            .faces
            .iter()
            .find(|face| face.glyph_for_char(codepoint).is_some())?;
        Some(self.instantiate(key, face))
    }

    fn last_resort(&self, key: &FontDescriptionKey) -> Option<PlatformFont> {
        let face = self.faces.first()?;
        Some(self.instantiate(key, face))
    }
}

impl fmt::Debug for MemoryFontSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFontSystem")
            .field("faces", &self.faces.len())
            .finish()
    }
}

/// Reads the family name of a font, preferring the typographic family
/// and an English record within it.
fn family_name(font: &FontRef<'_>) -> Option<String> {
    let name = font.name().ok()?;
    let data = name.string_data();
    for id in [NameId::TYPOGRAPHIC_FAMILY_NAME, NameId::FAMILY_NAME] {
        let mut first = None;
        for record in name.name_record() {
            if record.name_id() != id {
                continue;
            }
            let Ok(value) = record.string(data) else {
                continue;
            };
            // Windows language 0x409 is US English.
            if record.language_id() == 0x409 {
                first = Some(value);
                break;
            }
            if first.is_none() {
                first = Some(value);
            }
        }
        if let Some(value) = first {
            let family: String = value.chars().collect();
            if !family.is_empty() {
                return Some(family);
            }
        }
    }
    None
}
