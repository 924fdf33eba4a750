//! Rendering engine for verification diagnostics.
//!
//! Turns per-line verifier status into gutter icons, animates lines that
//! are being verified, and outlines the ranges an error relates to. The
//! engine has no IO of its own: it paints through an [`EditorSurface`]
//! implemented by the host and keeps time through deadlines the host polls.

mod catalog;
mod classify;
mod compact;
mod graph;
mod highlight;
mod render_loop;
mod scheduler;
mod status_bar;
mod store;
mod surface;
mod view;

pub use catalog::{DecorationCatalog, GutterIcon, IconSet, RelationStyles};
pub use classify::classify;
pub use compact::{StatusRanges, compact};
pub use graph::{LineRelations, RelationGraph};
pub use highlight::{HighlightPlan, RelationHighlighter, closest_range, range_distance};
pub use render_loop::RenderLoop;
pub use scheduler::{ApplyOutcome, RenderScheduler, RenderWork};
pub use status_bar::{StatusBar, StatusText};
pub use store::{DocumentDiagnostics, DocumentStore};
pub use surface::{ActiveEditor, EditorSurface, OutlineStroke, StyleHandle, StyleSpec};
pub use view::{RenderSettings, VerificationView};
