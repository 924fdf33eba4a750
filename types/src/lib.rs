//! Core domain types for veriscope.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Both the verifier client (`veriscope-lsp`) and the rendering engine
//! (`veriscope-render`) speak in these types.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod diagnostics;
mod range;
mod status;

pub use diagnostics::{Diagnostic, RelatedLocation, VerificationDiagnostics};
pub use range::{LINE_MARKER_COLUMN, Position, TextRange};
pub use status::LineStatus;
