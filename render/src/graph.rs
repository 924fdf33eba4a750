//! Relation graph: which ranges a diagnostic relates to, indexed by line.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use veriscope_types::{Diagnostic, TextRange};

/// Primary ranges starting on one line, each with its related ranges.
///
/// Keys keep insertion order so lookups that break ties by "first found"
/// follow diagnostic arrival order.
pub type LineRelations = IndexMap<TextRange, Vec<TextRange>>;

/// `line → (primary range → related ranges)`.
///
/// A primary range whose list holds only itself is a simple error. More
/// than one entry marks a compound error that needs the cursor position to
/// pick which part is active. Built fresh per update, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationGraph {
    lines: BTreeMap<u32, LineRelations>,
}

impl RelationGraph {
    /// Build the graph for `document_uri` from its diagnostics.
    ///
    /// Related locations in other documents are not navigable and are left
    /// out. Lists are concatenated in arrival order without deduplication.
    #[must_use]
    pub fn build(document_uri: &str, diagnostics: &[Diagnostic]) -> Self {
        let mut graph = Self::default();
        for diagnostic in diagnostics {
            let range = diagnostic.range();
            graph.add_entry(range, range);
            for related in diagnostic.related() {
                if related.uri != document_uri {
                    tracing::trace!(
                        uri = %related.uri,
                        "Skipping cross-document related location"
                    );
                    continue;
                }
                graph.add_entry(range, related.range);
                graph.add_entry(related.range, range);
                graph.add_entry(related.range, related.range);
            }
        }
        graph
    }

    fn add_entry(&mut self, primary: TextRange, related: TextRange) {
        self.lines
            .entry(primary.start.line)
            .or_default()
            .entry(primary)
            .or_default()
            .push(related);
    }

    /// Primary ranges starting on `line`.
    #[must_use]
    pub fn line(&self, line: u32) -> Option<&LineRelations> {
        self.lines.get(&line)
    }

    /// Related ranges of `primary`, empty if it is not a key.
    #[must_use]
    pub fn related(&self, primary: &TextRange) -> &[TextRange] {
        self.line(primary.start.line)
            .and_then(|relations| relations.get(primary))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines holding at least one primary range.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
