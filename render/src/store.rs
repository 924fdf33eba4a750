//! Document diagnostics store: the latest rendered state per open document.

use std::collections::HashMap;

use veriscope_types::VerificationDiagnostics;

use crate::classify::classify;
use crate::compact::{StatusRanges, compact};
use crate::graph::RelationGraph;

/// Everything needed to paint one document: gutter ranges and the relation graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentDiagnostics {
    ranges: StatusRanges,
    graph: RelationGraph,
}

impl DocumentDiagnostics {
    #[must_use]
    pub fn new(ranges: StatusRanges, graph: RelationGraph) -> Self {
        Self { ranges, graph }
    }

    /// Classify, compact and build the graph for one verifier update.
    #[must_use]
    pub fn from_update(update: &VerificationDiagnostics) -> Self {
        let ranges = compact(&classify(&update.per_line));
        let graph = RelationGraph::build(&update.uri, &update.diagnostics);
        Self { ranges, graph }
    }

    #[must_use]
    pub fn ranges(&self) -> &StatusRanges {
        &self.ranges
    }

    #[must_use]
    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }
}

/// Maps document URI → its current [`DocumentDiagnostics`].
///
/// Entries are replaced wholesale and never merged. A missing entry means
/// "nothing to show", not an error.
#[derive(Debug, Default)]
pub struct DocumentStore {
    data: HashMap<String, DocumentDiagnostics>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, uri: impl Into<String>, diagnostics: DocumentDiagnostics) {
        self.data.insert(uri.into(), diagnostics);
    }

    #[must_use]
    pub fn get(&self, uri: &str) -> Option<&DocumentDiagnostics> {
        self.data.get(uri)
    }

    /// Drop the entry for a closed document. Returns whether one existed.
    pub fn remove(&mut self, uri: &str) -> bool {
        self.data.remove(uri).is_some()
    }

    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.data.contains_key(uri)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
