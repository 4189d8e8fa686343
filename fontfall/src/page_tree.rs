// Copyright 2026 the Fontfall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena of glyph pages organized by fallback level.
//!
//! Each node pairs one font with one page of codepoints; its children
//! extend the page with the next fallback font. Nodes are addressed by
//! id so pruning a destroyed font is a map sweep rather than a pointer
//! walk.

use hashbrown::HashMap;

use super::data::{FontId, RealizedFont};
use super::glyph_page::{GlyphData, GlyphPage};

/// Identifier of a node in the page arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct NodeId(u64);

/// Resolution state of one node's page.
#[derive(Clone, Debug)]
pub enum PageState {
    /// No codepoint of the page resolved at this level or above.
    Empty,
    /// At least one codepoint resolved.
    Present(GlyphPage),
}

impl PageState {
    fn page(&self) -> Option<&GlyphPage> {
        match self {
            Self::Present(page) => Some(page),
            Self::Empty => None,
        }
    }
}

#[derive(Debug)]
struct Node {
    /// Owning font, or `None` for a system-fallback leaf.
    font: Option<FontId>,
    page_number: u32,
    level: usize,
    state: PageState,
    children: HashMap<Option<FontId>, NodeId>,
}

/// The per-process glyph page arena.
#[derive(Debug, Default)]
pub struct PageArena {
    nodes: HashMap<NodeId, Node>,
    roots: HashMap<(FontId, u32), NodeId>,
    next_id: u64,
}

impl PageArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, node);
        id
    }

    /// Returns the level-0 node for the given font and page, creating
    /// and filling it on first use.
    pub fn root(&mut self, font: &RealizedFont, page_number: u32) -> NodeId {
        let key = (font.id(), page_number);
        if let Some(&id) = self.roots.get(&key) {
            return id;
        }
        let state = match GlyphPage::fill(None, page_number, font) {
            Some(page) => PageState::Present(page),
            None => PageState::Empty,
        };
        let id = self.insert(Node {
            font: Some(font.id()),
            page_number,
            level: 0,
            state,
            children: HashMap::new(),
        });
        self.roots.insert(key, id);
        id
    }

    /// Returns the next fallback level below `parent`, creating it on
    /// first use.
    ///
    /// With a font, the child's page extends the parent's by resolving
    /// every still-unset slot against it. With `None`, the child is a
    /// system-fallback leaf whose page starts as a copy of the parent's
    /// and grows one character at a time.
    ///
    /// Returns `None` when `parent` is stale, such as an id retained
    /// across a prune.
    pub fn child(&mut self, parent: NodeId, next_font: Option<&RealizedFont>) -> Option<NodeId> {
        let parent_node = self.nodes.get(&parent)?;
        let child_key = next_font.map(RealizedFont::id);
        if let Some(&id) = parent_node.children.get(&child_key) {
            return Some(id);
        }
        let page_number = parent_node.page_number;
        let level = parent_node.level + 1;
        let parent_page = parent_node.state.page().cloned();
        let state = match next_font {
            Some(font) => match GlyphPage::fill(parent_page.as_ref(), page_number, font) {
                Some(page) => PageState::Present(page),
                None => PageState::Empty,
            },
            None => PageState::Present(parent_page.unwrap_or_else(GlyphPage::new)),
        };
        let id = self.insert(Node {
            font: child_key,
            page_number,
            level,
            state,
            children: HashMap::new(),
        });
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.insert(child_key, id);
        }
        Some(id)
    }

    /// Returns the node's fallback level, 0-based. Stale ids report
    /// level 0.
    pub fn level(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map_or(0, |node| node.level)
    }

    /// Returns `true` if the node was synthesized for per-character
    /// system fallback.
    pub fn is_system_fallback(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.font.is_none())
    }

    /// Returns the glyph resolved for the codepoint at this node, if
    /// the node's page has one.
    pub fn glyph_data(&self, id: NodeId, codepoint: u32) -> Option<GlyphData> {
        self.nodes
            .get(&id)?
            .state
            .page()
            .and_then(|page| page.glyph_data_for(codepoint))
    }

    /// Records a per-character substitution result in a system-fallback
    /// leaf so repeated lookups of the character are direct hits.
    pub fn cache_system_fallback(&mut self, id: NodeId, codepoint: u32, data: GlyphData) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        debug_assert!(node.font.is_none());
        let page = match &mut node.state {
            PageState::Present(page) => page,
            state => {
                *state = PageState::Present(GlyphPage::new());
                match state {
                    PageState::Present(page) => page,
                    _ => unreachable!(),
                }
            }
        };
        page.set(codepoint, data);
    }

    /// Removes every node owned by any of the given fonts, together
    /// with all their descendants.
    pub fn prune(&mut self, fonts: &[FontId]) {
        let mut doomed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.font.is_some_and(|font| fonts.contains(&font)))
            .map(|(&id, _)| id)
            .collect();
        let mut index = 0;
        while index < doomed.len() {
            let id = doomed[index];
            index += 1;
            if let Some(node) = self.nodes.remove(&id) {
                doomed.extend(node.children.values().copied());
            }
        }
        let nodes = &self.nodes;
        self.roots.retain(|_, id| nodes.contains_key(id));
        for node in self.nodes.values_mut() {
            node.children.retain(|_, id| !doomed.contains(id));
        }
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::simple_font;

    #[test]
    fn child_pages_extend_parent_coverage() {
        let upper = RealizedFont::Simple(simple_font("upper", &[(0x41, 0x5A)]));
        let lower = RealizedFont::Simple(simple_font("lower", &[(0x61, 0x7A)]));
        let mut arena = PageArena::new();
        let root = arena.root(&upper, 0);
        assert!(arena.glyph_data(root, 'A' as u32).is_some());
        assert!(arena.glyph_data(root, 'a' as u32).is_none());
        let child = arena.child(root, Some(&lower)).unwrap();
        assert_eq!(arena.level(child), 1);
        assert!(arena.glyph_data(child, 'A' as u32).is_some());
        assert!(arena.glyph_data(child, 'a' as u32).is_some());
        // Creation is memoized per (parent, next font).
        assert_eq!(arena.child(root, Some(&lower)), Some(child));
    }

    #[test]
    fn system_fallback_leaf_grows_per_character() {
        let upper = RealizedFont::Simple(simple_font("upper", &[(0x41, 0x5A)]));
        let substitute = simple_font("substitute", &[(0x00, 0xFF)]);
        let mut arena = PageArena::new();
        let root = arena.root(&upper, 0);
        let leaf = arena.child(root, None).unwrap();
        assert!(arena.is_system_fallback(leaf));
        // Already-resolved characters carry into the leaf page.
        assert!(arena.glyph_data(leaf, 'A' as u32).is_some());
        assert!(arena.glyph_data(leaf, 'a' as u32).is_none());
        arena.cache_system_fallback(
            leaf,
            'a' as u32,
            GlyphData {
                glyph: 7,
                font: substitute.clone(),
            },
        );
        let hit = arena.glyph_data(leaf, 'a' as u32).unwrap();
        assert_eq!(hit.glyph, 7);
        assert_eq!(hit.font.id(), substitute.id());
    }

    #[test]
    fn prune_removes_subtrees_and_edges() {
        let first = RealizedFont::Simple(simple_font("first", &[(0x41, 0x5A)]));
        let second = RealizedFont::Simple(simple_font("second", &[(0x61, 0x7A)]));
        let mut arena = PageArena::new();
        let root = arena.root(&first, 0);
        let child = arena.child(root, Some(&second)).unwrap();
        let _leaf = arena.child(child, None).unwrap();
        assert_eq!(arena.len(), 3);
        // Pruning the second font takes its node and the leaf below it.
        arena.prune(&[second.id()]);
        assert_eq!(arena.len(), 1);
        // The surviving parent no longer links to the pruned child.
        let recreated = arena.child(root, Some(&second)).unwrap();
        assert_ne!(recreated, child);
        // Pruning the root font empties the arena.
        arena.prune(&[first.id()]);
        assert!(arena.is_empty());
        assert_ne!(arena.root(&first, 0), root);
    }

    #[test]
    fn stale_node_ids_miss_without_panicking() {
        let only = RealizedFont::Simple(simple_font("only", &[(0x41, 0x5A)]));
        let substitute = simple_font("substitute", &[(0x00, 0xFF)]);
        let mut arena = PageArena::new();
        let root = arena.root(&only, 0);
        let leaf = arena.child(root, None).unwrap();
        arena.prune(&[only.id()]);
        assert!(arena.is_empty());
        // Ids retained across the prune degrade to misses.
        assert!(arena.glyph_data(leaf, 'A' as u32).is_none());
        assert!(!arena.is_system_fallback(leaf));
        assert_eq!(arena.level(leaf), 0);
        assert!(arena.child(leaf, None).is_none());
        arena.cache_system_fallback(
            leaf,
            'A' as u32,
            GlyphData {
                glyph: 1,
                font: substitute,
            },
        );
        assert!(arena.is_empty());
    }
}
