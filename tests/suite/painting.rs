//! Gutter icons painted for each status.

use veriscope_render::RenderWork;
use veriscope_types::LineStatus::{
    Error, ErrorRange, ResolutionError, Scheduled, Unknown, Verified, Verifying,
};
use veriscope_types::TextRange;

use crate::common::{DELAY, FRAME, URI, open_view, start, update};

const TEXT: &str = "lemma L()\n  ensures true\n{\n  assert false;\n}\n";

#[test]
fn test_error_range_brackets() {
    let (mut view, mut surface) = open_view(TEXT);
    view.on_verification_diagnostics(
        &update(&[Verified, ErrorRange, ErrorRange, Error, ErrorRange], vec![]),
        &mut surface,
        start(),
    );

    assert_eq!(surface.icon_ranges(URI, "error-range-start"), vec![TextRange::whole_lines(1, 1)]);
    assert_eq!(surface.icon_ranges(URI, "error-range"), vec![TextRange::whole_lines(2, 2)]);
    assert_eq!(surface.icon_ranges(URI, "error"), vec![TextRange::whole_lines(3, 3)]);
    assert_eq!(surface.icon_ranges(URI, "error-range-end"), vec![TextRange::whole_lines(4, 4)]);
    assert_eq!(
        surface.visible_icons(URI),
        vec!["error", "error-range", "error-range-end", "error-range-start", "verified"]
    );
}

#[test]
fn test_unknown_lines_have_no_icon() {
    let (mut view, mut surface) = open_view(TEXT);
    view.on_verification_diagnostics(&update(&[Unknown; 5], vec![]), &mut surface, start());
    assert!(surface.visible_icons(URI).is_empty());
}

#[test]
fn test_animation_alternates_frames() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, Verifying, Verifying, Scheduled, Scheduled], vec![]),
        &mut surface,
        now,
    );
    let verifying = vec![TextRange::whole_lines(1, 2)];
    assert_eq!(surface.icon_ranges(URI, "verifying"), verifying);
    assert!(surface.icon_ranges(URI, "verifying-2").is_empty());
    let static_paints = surface.paint_calls("verified");

    assert_eq!(view.poll(&mut surface, now + FRAME), RenderWork::Animate);
    assert!(surface.icon_ranges(URI, "verifying").is_empty());
    assert_eq!(surface.icon_ranges(URI, "verifying-2"), verifying);

    assert_eq!(view.poll(&mut surface, now + FRAME * 2), RenderWork::Animate);
    assert_eq!(surface.icon_ranges(URI, "verifying"), verifying);
    assert!(surface.icon_ranges(URI, "verifying-2").is_empty());

    // Static icons are left alone between frames.
    assert_eq!(surface.paint_calls("verified"), static_paints);
    assert_eq!(surface.icon_ranges(URI, "scheduled"), vec![TextRange::whole_lines(3, 4)]);
}

#[test]
fn test_settled_document_does_not_animate() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(&update(&[Verified; 5], vec![]), &mut surface, now);
    assert!(!view.is_animating());
    assert_eq!(view.poll(&mut surface, now + FRAME * 3), RenderWork::Idle);
}

#[test]
fn test_resolution_errors_switch_to_grayed_set() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, Error, Verified, Verified, Verified], vec![]),
        &mut surface,
        now,
    );
    view.on_verification_diagnostics(
        &update(&[Verified, Error, ResolutionError, Verified, Verified], vec![]),
        &mut surface,
        now,
    );
    view.poll(&mut surface, now + DELAY);

    assert_eq!(
        surface.visible_icons(URI),
        vec!["error_gray", "resolution-error", "verified_gray"]
    );
    assert!(surface.icon_ranges(URI, "verified").is_empty());
    assert!(surface.icon_ranges(URI, "error").is_empty());
    assert_eq!(surface.icon_ranges(URI, "error_gray"), vec![TextRange::whole_lines(1, 1)]);
}

#[test]
fn test_only_the_active_editor_is_painted() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    let other = "file:///work/other.dfy";

    let mut elsewhere = update(&[Error], vec![]);
    elsewhere.uri = other.to_string();
    view.on_verification_diagnostics(&elsewhere, &mut surface, now);
    assert!(surface.visible_icons(other).is_empty());
    assert!(surface.visible_icons(URI).is_empty());

    view.on_verification_diagnostics(&update(&[Verified; 5], vec![]), &mut surface, now);
    assert_eq!(surface.visible_icons(URI), vec!["verified"]);

    if let Some(editor) = surface.editor.as_mut() {
        editor.uri = other.to_string();
        editor.text = "x".to_string();
    }
    view.on_active_editor_changed(&mut surface);
    assert_eq!(surface.icon_ranges(other, "error"), vec![TextRange::whole_lines(0, 0)]);
}

#[test]
fn test_no_active_editor_paints_nothing() {
    let (mut view, mut surface) = open_view(TEXT);
    surface.editor = None;
    view.on_verification_diagnostics(&update(&[Verified; 5], vec![]), &mut surface, start());
    assert_eq!(surface.total_paint_calls(), 0);
}
