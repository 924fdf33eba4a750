//! Status bar model: verification outcome on the left, verifier version on the right.

use crate::surface::EditorSurface;

/// Text of both status items as handed to the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    /// Left item: outcome for the current document.
    pub document: String,
    /// Right item: verifier version. `None` until the server reports one.
    pub server: Option<String>,
    /// Tooltip of the right item.
    pub tooltip: Option<String>,
}

#[derive(Debug, Default)]
pub struct StatusBar {
    version: Option<String>,
    active_document: Option<String>,
    errors: usize,
}

impl StatusBar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub fn set_active_document(&mut self, uri: impl Into<String>) {
        self.active_document = Some(uri.into());
    }

    pub fn set_error_count(&mut self, errors: usize) {
        self.errors = errors;
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// What the status items should read right now.
    #[must_use]
    pub fn text(&self) -> StatusText {
        let Some(version) = self.version.as_deref() else {
            return StatusText {
                document: "Verifier starting...".to_string(),
                server: None,
                tooltip: None,
            };
        };

        let document = if self.errors > 0 {
            format!("Not verified - Errors: {}", self.errors)
        } else {
            "Verified".to_string()
        };
        let tooltip = match &self.active_document {
            Some(uri) => format!("Current document: {uri}"),
            None => "No document selected".to_string(),
        };
        StatusText {
            document,
            server: Some(format!("Verifier: {}", version.trim())),
            tooltip: Some(tooltip),
        }
    }

    /// Show the status for the active editor, or hide it when the editor is
    /// missing or holds another language.
    pub fn update<S: EditorSurface + ?Sized>(&self, surface: &mut S, language_id: &str) {
        let visible = surface
            .active_editor()
            .is_some_and(|editor| editor.language_id == language_id);
        if visible {
            surface.show_status(&self.text());
        } else {
            surface.hide_status();
        }
    }
}
