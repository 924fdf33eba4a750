//! The verification view: wires store, scheduler, highlighter and styles
//! to an [`EditorSurface`].

use std::path::PathBuf;
use std::time::{Duration, Instant};

use veriscope_types::{LineStatus, TextRange, VerificationDiagnostics};

use crate::catalog::{DecorationCatalog, GutterIcon, IconSet};
use crate::highlight::RelationHighlighter;
use crate::scheduler::{ApplyOutcome, RenderScheduler, RenderWork};
use crate::store::{DocumentDiagnostics, DocumentStore};
use crate::surface::EditorSurface;

/// Timing and asset settings for the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// How long flicker-prone updates are held back.
    pub delay: Duration,
    /// Time between animation frames.
    pub animation_period: Duration,
    /// Directory holding the gutter icon images.
    pub icon_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2000),
            animation_period: Duration::from_millis(200),
            icon_dir: PathBuf::from("images"),
        }
    }
}

/// Renders per-line verification status and related-range outlines.
///
/// The host forwards editor events to the `on_*` methods and calls
/// [`VerificationView::poll`] from its frame loop. Styles are created in
/// [`VerificationView::new`] and released by [`VerificationView::dispose`].
#[derive(Debug)]
pub struct VerificationView {
    store: DocumentStore,
    scheduler: RenderScheduler,
    highlighter: RelationHighlighter,
    catalog: DecorationCatalog,
}

impl VerificationView {
    pub fn new<S: EditorSurface + ?Sized>(settings: &RenderSettings, surface: &mut S) -> Self {
        Self {
            store: DocumentStore::new(),
            scheduler: RenderScheduler::new(settings.delay, settings.animation_period),
            highlighter: RelationHighlighter::new(),
            catalog: DecorationCatalog::acquire(surface, &settings.icon_dir),
        }
    }

    /// A new verification snapshot arrived for a document.
    pub fn on_verification_diagnostics<S: EditorSurface + ?Sized>(
        &mut self,
        update: &VerificationDiagnostics,
        surface: &mut S,
        now: Instant,
    ) -> ApplyOutcome {
        let data = DocumentDiagnostics::from_update(update);
        let outcome = self.scheduler.apply(update.uri.as_str(), data, &mut self.store, now);
        if outcome == ApplyOutcome::Applied {
            self.repaint(surface, false);
        }
        outcome
    }

    /// The cursor moved in the active editor.
    pub fn on_selection_changed<S: EditorSurface + ?Sized>(&mut self, surface: &mut S) {
        self.highlighter
            .refresh(&self.store, self.catalog.relations(), surface, false);
    }

    /// Another editor took focus.
    pub fn on_active_editor_changed<S: EditorSurface + ?Sized>(&mut self, surface: &mut S) {
        self.repaint(surface, false);
    }

    /// Drop everything held for a closed document.
    pub fn on_document_closed(&mut self, uri: &str) {
        self.scheduler.cancel_for(uri);
        self.highlighter.forget(uri);
        if self.store.remove(uri) {
            tracing::debug!(uri = %uri, "Dropped diagnostics for closed document");
        }
    }

    /// Run whatever timer work is due.
    pub fn poll<S: EditorSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> RenderWork {
        let work = self.scheduler.poll(&mut self.store, now);
        match work {
            RenderWork::Repaint { .. } => self.repaint(surface, false),
            RenderWork::Animate => self.repaint(surface, true),
            RenderWork::Idle => {}
        }
        work
    }

    /// When [`VerificationView::poll`] next has something to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    #[must_use]
    pub fn catalog(&self) -> &DecorationCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    /// Release every style. The view cannot paint afterwards.
    pub fn dispose<S: EditorSurface + ?Sized>(self, surface: &mut S) {
        self.catalog.release(surface);
    }

    /// Paint the active editor's gutter from the store.
    ///
    /// `animate_only` repaints just the animated icons with the current frame.
    fn repaint<S: EditorSurface + ?Sized>(&mut self, surface: &mut S, animate_only: bool) {
        if !animate_only {
            self.highlighter
                .refresh(&self.store, self.catalog.relations(), surface, true);
        }

        let Some(uri) = surface.active_editor().map(|editor| editor.uri.to_string()) else {
            return;
        };
        let Some(data) = self.store.get(&uri) else {
            return;
        };

        let resolution_failed = data.ranges().has_resolution_errors();
        let frame = self.scheduler.frame();
        let sets = [
            (self.catalog.normal(), !resolution_failed),
            (self.catalog.grayed(), resolution_failed),
        ];
        for (icons, active) in sets {
            paint_icons(surface, &uri, icons, data, active, frame, animate_only);
        }
    }
}

fn paint_icons<S: EditorSurface + ?Sized>(
    surface: &mut S,
    uri: &str,
    icons: &IconSet,
    data: &DocumentDiagnostics,
    active: bool,
    frame: usize,
    animate_only: bool,
) {
    for status in LineStatus::ALL {
        let ranges: &[TextRange] = if active {
            data.ranges().get(status)
        } else {
            &[]
        };
        match icons.get(status) {
            None => {}
            Some(GutterIcon::Static(style)) => {
                if !animate_only {
                    surface.set_decorations(uri, style, ranges);
                }
            }
            Some(GutterIcon::Animated(frames)) => {
                for (index, style) in frames.into_iter().enumerate() {
                    let shown = if index == frame { ranges } else { &[] };
                    surface.set_decorations(uri, style, shown);
                }
            }
        }
    }
}
