//! Shared test utilities and fixtures
//!
//! A recording editor surface and builders for verifier updates.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::{Duration, Instant};

use veriscope_render::{
    ActiveEditor, EditorSurface, RenderSettings, StatusText, StyleHandle, StyleSpec,
    VerificationView,
};
use veriscope_types::{
    Diagnostic, LineStatus, Position, RelatedLocation, TextRange, VerificationDiagnostics,
};

pub const URI: &str = "file:///work/sum.dfy";
pub const DELAY: Duration = Duration::from_millis(2000);
pub const FRAME: Duration = Duration::from_millis(200);

pub struct OpenEditor {
    pub uri: String,
    pub language_id: String,
    pub text: String,
    pub selection: TextRange,
}

/// Editor surface that remembers every style and the last ranges painted with it.
#[derive(Default)]
pub struct RecordingSurface {
    pub editor: Option<OpenEditor>,
    pub status: Option<StatusText>,
    styles: HashMap<StyleHandle, StyleSpec>,
    next_style: u32,
    painted: HashMap<(String, StyleHandle), Vec<TextRange>>,
    paint_calls: HashMap<StyleHandle, usize>,
}

impl RecordingSurface {
    pub fn with_document(uri: &str, text: &str) -> Self {
        Self {
            editor: Some(OpenEditor {
                uri: uri.to_string(),
                language_id: "dafny".to_string(),
                text: text.to_string(),
                selection: TextRange::default(),
            }),
            ..Self::default()
        }
    }

    pub fn move_cursor(&mut self, line: u32, character: u32) {
        if let Some(editor) = self.editor.as_mut() {
            let at = Position::new(line, character);
            editor.selection = TextRange::new(at, at);
        }
    }

    pub fn edit(&mut self, text: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.text = text.to_string();
        }
    }

    pub fn live_styles(&self) -> usize {
        self.styles.len()
    }

    fn icons_named(&self, name: &str) -> Vec<StyleHandle> {
        let mut handles: Vec<StyleHandle> = self
            .styles
            .iter()
            .filter(|(_, spec)| matches!(spec, StyleSpec::GutterIcon { name: n, .. } if *n == name))
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort();
        handles
    }

    /// Ranges last painted in `uri` with `style`.
    pub fn ranges(&self, uri: &str, style: StyleHandle) -> Vec<TextRange> {
        self.painted
            .get(&(uri.to_string(), style))
            .cloned()
            .unwrap_or_default()
    }

    /// Ranges painted in `uri` with every icon called `name`.
    pub fn icon_ranges(&self, uri: &str, name: &str) -> Vec<TextRange> {
        self.icons_named(name)
            .into_iter()
            .flat_map(|style| self.ranges(uri, style))
            .collect()
    }

    /// Icon names with a non-empty paint in `uri`, sorted.
    pub fn visible_icons(&self, uri: &str) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .painted
            .iter()
            .filter(|((painted_uri, _), ranges)| painted_uri == uri && !ranges.is_empty())
            .filter_map(|((_, style), _)| match self.styles.get(style) {
                Some(StyleSpec::GutterIcon { name, .. }) => Some(*name),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// How often any icon called `name` was painted.
    pub fn paint_calls(&self, name: &str) -> usize {
        self.icons_named(name)
            .iter()
            .map(|style| self.paint_calls.get(style).copied().unwrap_or(0))
            .sum()
    }

    pub fn total_paint_calls(&self) -> usize {
        self.paint_calls.values().sum()
    }
}

impl EditorSurface for RecordingSurface {
    fn active_editor(&self) -> Option<ActiveEditor<'_>> {
        self.editor.as_ref().map(|editor| ActiveEditor {
            uri: &editor.uri,
            language_id: &editor.language_id,
            text: &editor.text,
            selection: editor.selection,
        })
    }

    fn create_style(&mut self, spec: &StyleSpec) -> StyleHandle {
        self.next_style += 1;
        let handle = StyleHandle::new(self.next_style);
        self.styles.insert(handle, spec.clone());
        handle
    }

    fn dispose_style(&mut self, style: StyleHandle) {
        assert!(self.styles.remove(&style).is_some(), "style disposed twice");
    }

    fn set_decorations(&mut self, uri: &str, style: StyleHandle, ranges: &[TextRange]) {
        assert!(self.styles.contains_key(&style), "painting with a disposed style");
        *self.paint_calls.entry(style).or_default() += 1;
        self.painted.insert((uri.to_string(), style), ranges.to_vec());
    }

    fn show_status(&mut self, status: &StatusText) {
        self.status = Some(status.clone());
    }

    fn hide_status(&mut self) {
        self.status = None;
    }
}

pub fn settings() -> RenderSettings {
    RenderSettings {
        delay: DELAY,
        animation_period: FRAME,
        ..RenderSettings::default()
    }
}

/// A view over a surface showing `URI` with `text`.
pub fn open_view(text: &str) -> (VerificationView, RecordingSurface) {
    let mut surface = RecordingSurface::with_document(URI, text);
    let view = VerificationView::new(&settings(), &mut surface);
    (view, surface)
}

pub fn update(per_line: &[LineStatus], diagnostics: Vec<Diagnostic>) -> VerificationDiagnostics {
    VerificationDiagnostics {
        uri: URI.to_string(),
        version: Some(1),
        per_line: per_line.to_vec(),
        diagnostics,
    }
}

pub fn error_at(range: TextRange, related: &[TextRange]) -> Diagnostic {
    Diagnostic::new(
        range,
        "assertion might not hold",
        related
            .iter()
            .map(|&range| RelatedLocation {
                uri: URI.to_string(),
                range,
            })
            .collect(),
    )
}

pub fn start() -> Instant {
    Instant::now()
}
