//! In-memory editor surface that renders the gutter as text.

use std::collections::HashMap;
use std::fmt::Write;

use veriscope_render::{
    ActiveEditor, EditorSurface, OutlineStroke, StatusText, StyleHandle, StyleSpec,
};
use veriscope_types::{Position, TextRange};

/// A single open document with one cursor.
pub struct TerminalSurface {
    uri: String,
    language_id: String,
    text: String,
    selection: TextRange,
    styles: HashMap<StyleHandle, StyleSpec>,
    next_style: u32,
    decorations: HashMap<StyleHandle, Vec<TextRange>>,
    status: Option<StatusText>,
}

impl TerminalSurface {
    pub fn new(uri: String, language_id: String, text: String) -> Self {
        Self {
            uri,
            language_id,
            text,
            selection: TextRange::default(),
            styles: HashMap::new(),
            next_style: 0,
            decorations: HashMap::new(),
            status: None,
        }
    }

    /// Put the cursor at the start of `line`.
    pub fn move_cursor(&mut self, line: u32) {
        let position = Position::new(line, 0);
        self.selection = TextRange::new(position, position);
    }

    fn gutter_glyph(&self, line: u32) -> char {
        self.decorations
            .iter()
            .filter(|(_, ranges)| ranges.iter().any(|r| r.contains_line(line)))
            .find_map(|(style, _)| match self.styles.get(style) {
                Some(StyleSpec::GutterIcon { name, .. }) => Some(glyph(name)),
                _ => None,
            })
            .unwrap_or(' ')
    }

    /// Underline for outlined ranges touching `line`, if any.
    fn outline_marks(&self, line: u32, width: usize) -> Option<String> {
        let mut marks = vec![' '; width];
        let mut any = false;
        for (style, ranges) in &self.decorations {
            let Some(StyleSpec::Outline { stroke, .. }) = self.styles.get(style) else {
                continue;
            };
            let mark = match stroke {
                OutlineStroke::Solid => '^',
                OutlineStroke::Dashed => '~',
            };
            for range in ranges.iter().filter(|r| r.contains_line(line)) {
                let from = if range.start.line == line {
                    range.start.character as usize
                } else {
                    0
                };
                let to = if range.end.line == line {
                    range.end.character as usize
                } else {
                    width
                };
                for slot in marks.iter_mut().take(to.min(width)).skip(from) {
                    *slot = mark;
                    any = true;
                }
            }
        }
        any.then(|| marks.into_iter().collect::<String>().trim_end().to_string())
    }

    /// The document with one gutter glyph per line, followed by the status line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, text) in self.text.lines().enumerate() {
            let line = index as u32;
            let _ = writeln!(out, "{} {:>4} | {text}", self.gutter_glyph(line), index + 1);
            if let Some(marks) = self.outline_marks(line, text.chars().count()) {
                let _ = writeln!(out, "{:>6} | {marks}", "");
            }
        }
        if let Some(status) = &self.status {
            let _ = write!(out, "\n{}", status.document);
            if let Some(server) = &status.server {
                let _ = write!(out, "  [{server}]");
            }
            out.push('\n');
        }
        out
    }
}

/// Text glyph for a gutter icon. Grayed and animation variants share the
/// glyph of their base icon.
fn glyph(name: &str) -> char {
    let name = name.trim_end_matches("_gray").trim_end_matches("-2");
    if name.starts_with("resolution-error") {
        '!'
    } else if name.starts_with("error-range-start") {
        '┌'
    } else if name.starts_with("error-range-end") {
        '└'
    } else if name.starts_with("error-range") {
        '│'
    } else if name.starts_with("error") {
        '✗'
    } else if name.starts_with("verified") {
        '✓'
    } else if name.starts_with("verifying") {
        '~'
    } else if name.starts_with("scheduled") {
        '·'
    } else {
        ' '
    }
}

impl EditorSurface for TerminalSurface {
    fn active_editor(&self) -> Option<ActiveEditor<'_>> {
        Some(ActiveEditor {
            uri: &self.uri,
            language_id: &self.language_id,
            text: &self.text,
            selection: self.selection,
        })
    }

    fn create_style(&mut self, spec: &StyleSpec) -> StyleHandle {
        self.next_style += 1;
        let handle = StyleHandle::new(self.next_style);
        self.styles.insert(handle, spec.clone());
        handle
    }

    fn dispose_style(&mut self, style: StyleHandle) {
        self.styles.remove(&style);
        self.decorations.remove(&style);
    }

    fn set_decorations(&mut self, uri: &str, style: StyleHandle, ranges: &[TextRange]) {
        if uri != self.uri {
            return;
        }
        if ranges.is_empty() {
            self.decorations.remove(&style);
        } else {
            self.decorations.insert(style, ranges.to_vec());
        }
    }

    fn show_status(&mut self, status: &StatusText) {
        self.status = Some(status.clone());
    }

    fn hide_status(&mut self) {
        self.status = None;
    }
}
