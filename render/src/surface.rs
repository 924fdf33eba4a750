//! The editor as seen by the rendering engine.
//!
//! The engine never touches an editor directly. Hosts implement
//! [`EditorSurface`] to expose the active editor and to paint ranges with
//! styles the engine created up front.

use std::path::PathBuf;

use veriscope_types::TextRange;

use crate::status_bar::StatusText;

/// Opaque id of a decoration style created by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleHandle(u32);

impl StyleHandle {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Stroke of a relation outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineStroke {
    Solid,
    Dashed,
}

/// What a decoration style looks like. Handed to the surface once, at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSpec {
    /// Whole-line gutter icon.
    GutterIcon {
        /// Icon name, e.g. `error-range-start` or `verified_gray`.
        name: &'static str,
        /// Image file backing the icon.
        path: PathBuf,
    },
    /// Character-range outline drawn around related ranges.
    Outline {
        /// CSS hex color, `#rrggbb` or `#rrggbbaa`.
        color: &'static str,
        width_px: u8,
        stroke: OutlineStroke,
    },
}

/// Snapshot of the editor that currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEditor<'a> {
    pub uri: &'a str,
    pub language_id: &'a str,
    pub text: &'a str,
    /// Primary selection; an empty range is a plain cursor.
    pub selection: TextRange,
}

/// Rendering surface implemented by the host editor.
///
/// Only the active editor is ever painted. `set_decorations` replaces the
/// ranges previously painted with `style`; it never appends.
pub trait EditorSurface {
    fn active_editor(&self) -> Option<ActiveEditor<'_>>;

    fn create_style(&mut self, spec: &StyleSpec) -> StyleHandle;

    fn dispose_style(&mut self, style: StyleHandle);

    fn set_decorations(&mut self, uri: &str, style: StyleHandle, ranges: &[TextRange]);

    fn show_status(&mut self, status: &StatusText);

    fn hide_status(&mut self);
}
