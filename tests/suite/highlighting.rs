//! Related-range outlines around the cursor.

use veriscope_render::VerificationView;
use veriscope_types::LineStatus::{Error, ErrorRange, ResolutionError, Verified};
use veriscope_types::{LineStatus, TextRange};

use crate::common::{DELAY, RecordingSurface, URI, error_at, open_view, start, update};

const TEXT: &str = "method M(x: int)\n  requires x > 0\n{ M(0); M(-1); }\n";

const STATUSES: [LineStatus; 3] = [Verified, ErrorRange, Error];

fn precondition() -> TextRange {
    TextRange::from_coords(1, 11, 1, 16)
}

fn first_call() -> TextRange {
    TextRange::from_coords(2, 2, 2, 6)
}

fn second_call() -> TextRange {
    TextRange::from_coords(2, 8, 2, 13)
}

/// Both calls fail the same precondition.
fn compound_view() -> (VerificationView, RecordingSurface) {
    let (mut view, mut surface) = open_view(TEXT);
    let diagnostics = vec![
        error_at(first_call(), &[precondition()]),
        error_at(second_call(), &[precondition()]),
    ];
    view.on_verification_diagnostics(&update(&STATUSES, diagnostics), &mut surface, start());
    (view, surface)
}

struct Layers {
    simple: Vec<TextRange>,
    partial: Vec<TextRange>,
    partial_active: Vec<TextRange>,
}

fn layers(view: &VerificationView, surface: &RecordingSurface) -> Layers {
    let styles = view.catalog().relations();
    Layers {
        simple: surface.ranges(URI, styles.simple),
        partial: surface.ranges(URI, styles.partial),
        partial_active: surface.ranges(URI, styles.partial_active),
    }
}

#[test]
fn test_cursor_away_from_relations_paints_nothing() {
    let (view, surface) = compound_view();
    let layers = layers(&view, &surface);
    assert!(layers.simple.is_empty());
    assert!(layers.partial.is_empty());
    assert!(layers.partial_active.is_empty());
}

#[test]
fn test_closest_call_is_active_and_other_is_passive() {
    let (mut view, mut surface) = compound_view();
    surface.move_cursor(2, 9);
    view.on_selection_changed(&mut surface);

    let layers = layers(&view, &surface);
    assert_eq!(
        layers.partial_active,
        vec![second_call(), second_call(), precondition()]
    );
    assert_eq!(layers.partial, vec![first_call()]);
    assert!(layers.simple.is_empty());
}

#[test]
fn test_cursor_between_calls_picks_nearer_one() {
    let (mut view, mut surface) = compound_view();
    // One column from either call; the first one wins.
    surface.move_cursor(2, 7);
    view.on_selection_changed(&mut surface);

    let layers = layers(&view, &surface);
    assert_eq!(layers.partial_active[0], first_call());
    assert_eq!(layers.partial, vec![second_call()]);
}

#[test]
fn test_shared_precondition_outlines_every_caller() {
    let (mut view, mut surface) = compound_view();
    surface.move_cursor(1, 0);
    view.on_selection_changed(&mut surface);

    let layers = layers(&view, &surface);
    assert_eq!(
        layers.partial_active,
        vec![
            precondition(),
            first_call(),
            precondition(),
            second_call(),
            precondition()
        ]
    );
    assert!(layers.partial.is_empty());
}

#[test]
fn test_error_without_related_is_simple() {
    let (mut view, mut surface) = open_view(TEXT);
    let assertion = TextRange::from_coords(2, 2, 2, 6);
    view.on_verification_diagnostics(
        &update(&STATUSES, vec![error_at(assertion, &[])]),
        &mut surface,
        start(),
    );
    surface.move_cursor(2, 0);
    view.on_selection_changed(&mut surface);

    let layers = layers(&view, &surface);
    assert_eq!(layers.simple, vec![assertion]);
    assert!(layers.partial_active.is_empty());
}

#[test]
fn test_edited_text_skips_cursor_highlight_until_repaint() {
    let (mut view, mut surface) = compound_view();
    surface.edit("method M(x: int)\n  requires x > 0\n{ M(0); M(-1); M(2); }\n");
    surface.move_cursor(2, 3);
    view.on_selection_changed(&mut surface);
    assert!(layers(&view, &surface).partial_active.is_empty());

    // A full repaint accepts the current text again.
    view.on_active_editor_changed(&mut surface);
    assert_eq!(layers(&view, &surface).partial_active[0], first_call());
}

#[test]
fn test_resolution_errors_clear_outlines() {
    let (mut view, mut surface) = compound_view();
    surface.move_cursor(2, 3);
    view.on_selection_changed(&mut surface);
    assert!(!layers(&view, &surface).partial_active.is_empty());

    let now = start();
    view.on_verification_diagnostics(
        &update(
            &[Verified, ResolutionError, Verified],
            vec![error_at(first_call(), &[precondition()])],
        ),
        &mut surface,
        now,
    );
    view.poll(&mut surface, now + DELAY);

    let layers = layers(&view, &surface);
    assert!(layers.partial_active.is_empty());
    assert!(layers.partial.is_empty());
    assert!(layers.simple.is_empty());
}
