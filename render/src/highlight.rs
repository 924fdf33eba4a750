//! Related-range highlighting around the cursor.
//!
//! Every error starting on the cursor line gets an outline. Compound errors
//! (those relating to ranges elsewhere) are split: the one closest to the
//! selection is drawn active together with everything it relates to, the
//! others are drawn as passive parts.

use std::collections::HashMap;

use veriscope_types::TextRange;

use crate::catalog::RelationStyles;
use crate::graph::LineRelations;
use crate::store::DocumentStore;
use crate::surface::EditorSurface;

const LINE_DISTANCE: u32 = 1000;

/// How far `key` is from `selection`.
///
/// Overlapping or nested ranges are at distance 0. Ranges on different lines
/// are `1000` per line apart. On the same line, the character gap counts.
#[must_use]
pub fn range_distance(key: &TextRange, selection: &TextRange) -> u32 {
    let overlaps = key.intersection(selection).is_some_and(|r| !r.is_empty());
    if overlaps || key.contains(selection) || selection.contains(key) {
        return 0;
    }
    if key.end.line < selection.start.line {
        (selection.start.line - key.end.line).saturating_mul(LINE_DISTANCE)
    } else if selection.end.line < key.start.line {
        (key.start.line - selection.end.line).saturating_mul(LINE_DISTANCE)
    } else if key.end.character < selection.start.character {
        selection.start.character - key.end.character
    } else {
        key.start.character.saturating_sub(selection.end.character)
    }
}

/// The candidate nearest to `selection`; the first one wins a tie.
#[must_use]
pub fn closest_range<'a>(
    selection: &TextRange,
    candidates: impl IntoIterator<Item = &'a TextRange>,
) -> Option<&'a TextRange> {
    let mut best: Option<(&TextRange, u32)> = None;
    for candidate in candidates {
        let distance = range_distance(candidate, selection);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(range, _)| range)
}

/// Ranges for each of the three relation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightPlan {
    pub simple: Vec<TextRange>,
    pub partial: Vec<TextRange>,
    pub partial_active: Vec<TextRange>,
}

impl HighlightPlan {
    /// Sort the primary ranges of one line into layers.
    #[must_use]
    pub fn plan(relations: &LineRelations, selection: &TextRange) -> Self {
        let mut plan = Self::default();
        let closest = closest_range(selection, relations.keys());
        let sole = relations.len() == 1;

        for (key, related) in relations {
            if related.len() <= 1 {
                plan.simple.push(*key);
            } else if sole || closest == Some(key) {
                plan.partial_active.push(*key);
                plan.partial_active.extend_from_slice(related);
            } else {
                plan.partial.push(*key);
            }
        }
        plan
    }

    fn paint<S: EditorSurface + ?Sized>(&self, surface: &mut S, uri: &str, styles: &RelationStyles) {
        surface.set_decorations(uri, styles.simple, &self.simple);
        surface.set_decorations(uri, styles.partial, &self.partial);
        surface.set_decorations(uri, styles.partial_active, &self.partial_active);
    }
}

/// Paints relation outlines for the active editor.
///
/// Graph ranges are only meaningful against the text they were computed
/// for. The highlighter remembers that text per document and skips cursor
/// moves once the buffer has diverged, until the next repaint catches up.
#[derive(Debug, Default)]
pub struct RelationHighlighter {
    last_resolved: HashMap<String, String>,
}

impl RelationHighlighter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute and paint the relation layers for the active editor.
    ///
    /// With `store_document_state` set (repaints after new data) the current
    /// text becomes the resolved text. Without it (cursor moves) a changed
    /// text leaves the layers untouched.
    pub fn refresh<S: EditorSurface + ?Sized>(
        &mut self,
        store: &DocumentStore,
        styles: &RelationStyles,
        surface: &mut S,
        store_document_state: bool,
    ) {
        let Some(editor) = surface.active_editor() else {
            return;
        };
        let uri = editor.uri.to_string();
        let selection = editor.selection;

        if self.last_resolved.get(&uri).map(String::as_str) != Some(editor.text) {
            if !store_document_state {
                tracing::trace!(uri = %uri, "Text changed since last resolution; skipping highlight");
                return;
            }
            self.last_resolved.insert(uri.clone(), editor.text.to_string());
        }

        let plan = store
            .get(&uri)
            .filter(|data| !data.ranges().has_resolution_errors())
            .and_then(|data| data.graph().line(selection.start.line))
            .filter(|relations| !relations.is_empty())
            .map(|relations| HighlightPlan::plan(relations, &selection))
            .unwrap_or_default();
        plan.paint(surface, &uri, styles);
    }

    /// Forget the resolved text of a closed document.
    pub fn forget(&mut self, uri: &str) {
        self.last_resolved.remove(uri);
    }
}
