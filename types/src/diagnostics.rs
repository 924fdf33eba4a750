//! Verification diagnostics as consumed by the rendering engine.

use crate::range::TextRange;
use crate::status::LineStatus;

/// A secondary range a diagnostic points at (e.g. the failing precondition of a call).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLocation {
    /// URI of the document owning `range`.
    pub uri: String,
    pub range: TextRange,
}

/// A single verifier diagnostic with its related locations.
///
/// Fields are private; the related list is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    range: TextRange,
    message: String,
    related: Vec<RelatedLocation>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(range: TextRange, message: impl Into<String>, related: Vec<RelatedLocation>) -> Self {
        Self {
            range,
            message: message.into(),
            related,
        }
    }

    #[must_use]
    pub fn range(&self) -> TextRange {
        self.range
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn related(&self) -> &[RelatedLocation] {
        &self.related
    }
}

/// One full verification update for a document.
///
/// Every update replaces the previous one for the same document; nothing
/// is merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationDiagnostics {
    pub uri: String,
    pub version: Option<i32>,
    /// One status per source line.
    pub per_line: Vec<LineStatus>,
    pub diagnostics: Vec<Diagnostic>,
}
