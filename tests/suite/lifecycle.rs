//! Closing documents and tearing the view down.

use veriscope_render::{RenderWork, StatusBar};
use veriscope_types::LineStatus::{Error, ResolutionError, Verified, Verifying};
use veriscope_types::TextRange;

use crate::common::{DELAY, FRAME, URI, error_at, open_view, start, update};

const TEXT: &str = "method M()\n{\n}\n";

#[test]
fn test_close_drops_document_state() {
    let (mut view, mut surface) = open_view(TEXT);
    view.on_verification_diagnostics(
        &update(
            &[Verified, Error, Verified],
            vec![error_at(TextRange::from_coords(1, 0, 1, 1), &[])],
        ),
        &mut surface,
        start(),
    );
    assert!(view.store().contains(URI));

    view.on_document_closed(URI);
    assert!(!view.store().contains(URI));

    // Cursor moves in the closed document leave the surface alone.
    let before = surface.total_paint_calls();
    surface.move_cursor(1, 0);
    view.on_selection_changed(&mut surface);
    assert_eq!(surface.total_paint_calls(), before);
    let styles = view.catalog().relations();
    assert!(surface.ranges(URI, styles.simple).is_empty());
}

#[test]
fn test_close_cancels_held_update() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, ResolutionError, Verified], vec![]),
        &mut surface,
        now,
    );
    assert!(view.next_deadline().is_some());

    view.on_document_closed(URI);
    assert!(view.next_deadline().is_none());
    assert_eq!(view.poll(&mut surface, now + DELAY), RenderWork::Idle);
    assert!(!view.store().contains(URI));
}

#[test]
fn test_close_stops_animation_of_that_document() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, Verifying, Verified], vec![]),
        &mut surface,
        now,
    );
    assert!(view.is_animating());

    view.on_document_closed(URI);
    assert!(!view.is_animating());
    let before = surface.total_paint_calls();
    assert_eq!(view.poll(&mut surface, now + FRAME), RenderWork::Idle);
    assert_eq!(surface.total_paint_calls(), before);
}

#[test]
fn test_closing_another_document_keeps_animation() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, Verifying, Verified], vec![]),
        &mut surface,
        now,
    );

    view.on_document_closed("file:///work/other.dfy");
    assert_eq!(view.poll(&mut surface, now + FRAME), RenderWork::Animate);
}

#[test]
fn test_closing_another_document_keeps_held_update() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, ResolutionError, Verified], vec![]),
        &mut surface,
        now,
    );

    view.on_document_closed("file:///work/other.dfy");
    assert_eq!(
        view.poll(&mut surface, now + DELAY),
        RenderWork::Repaint { uri: URI.to_string() }
    );
}

#[test]
fn test_dispose_releases_every_style() {
    let (mut view, mut surface) = open_view(TEXT);
    let created = surface.live_styles();
    assert!(created > 0);

    let now = start();
    view.on_verification_diagnostics(&update(&[Verifying, Verifying, Verified], vec![]), &mut surface, now);
    view.poll(&mut surface, now + FRAME);

    view.dispose(&mut surface);
    assert_eq!(surface.live_styles(), 0);
}

#[test]
fn test_status_bar_follows_language() {
    let (_view, mut surface) = open_view(TEXT);
    let mut status = StatusBar::new();
    status.set_version("3.4.0\n".to_string());
    status.set_error_count(2);

    status.update(&mut surface, "dafny");
    let shown = surface.status.clone().unwrap();
    assert_eq!(shown.document, "Not verified - Errors: 2");
    assert_eq!(shown.server.as_deref(), Some("Verifier: 3.4.0"));

    status.update(&mut surface, "boogie");
    assert!(surface.status.is_none());
}
