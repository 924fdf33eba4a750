//! When verifier updates become visible.

use std::time::Duration;

use veriscope_render::{ApplyOutcome, RenderWork};
use veriscope_types::LineStatus::{
    Error, ResolutionError, Scheduled, Verified, VerifiedObsolete, VerifiedVerifying,
};
use veriscope_types::TextRange;

use crate::common::{DELAY, URI, open_view, start, update};

const TEXT: &str = "method M()\n{\n}\n";

#[test]
fn test_plain_update_applies_immediately() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();

    let outcome = view.on_verification_diagnostics(
        &update(&[Verified, Verified, Verified], vec![]),
        &mut surface,
        now,
    );

    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(surface.icon_ranges(URI, "verified"), vec![TextRange::whole_lines(0, 2)]);
    assert!(view.next_deadline().is_none());
}

#[test]
fn test_resolution_errors_held_for_delay() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(&update(&[Verified, Verified, Verified], vec![]), &mut surface, now);

    let outcome = view.on_verification_diagnostics(
        &update(&[Verified, ResolutionError, Verified], vec![]),
        &mut surface,
        now,
    );
    assert_eq!(outcome, ApplyOutcome::Delayed { until: now + DELAY });
    assert_eq!(view.next_deadline(), Some(now + DELAY));

    // Still showing the verified snapshot just before the deadline.
    let early = now + DELAY - Duration::from_millis(100);
    assert_eq!(view.poll(&mut surface, early), RenderWork::Idle);
    assert_eq!(surface.icon_ranges(URI, "verified"), vec![TextRange::whole_lines(0, 2)]);
    assert!(surface.icon_ranges(URI, "resolution-error").is_empty());

    let work = view.poll(&mut surface, now + DELAY);
    assert_eq!(work, RenderWork::Repaint { uri: URI.to_string() });
    assert_eq!(surface.icon_ranges(URI, "resolution-error"), vec![TextRange::whole_lines(1, 1)]);
    assert!(view.next_deadline().is_none());
}

#[test]
fn test_resolution_errors_not_held_when_already_shown() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    let broken = update(&[Verified, ResolutionError, Verified], vec![]);
    assert!(matches!(
        view.on_verification_diagnostics(&broken, &mut surface, now),
        ApplyOutcome::Delayed { .. }
    ));
    view.poll(&mut surface, now + DELAY);

    let still_broken = update(&[ResolutionError, ResolutionError, Verified], vec![]);
    let outcome = view.on_verification_diagnostics(&still_broken, &mut surface, now + DELAY);
    assert_eq!(outcome, ApplyOutcome::Applied);
}

#[test]
fn test_obsolete_without_verifying_is_held() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(&update(&[Verified, Error, Verified], vec![]), &mut surface, now);

    let outcome = view.on_verification_diagnostics(
        &update(&[VerifiedObsolete, VerifiedObsolete, VerifiedObsolete], vec![]),
        &mut surface,
        now,
    );
    assert!(matches!(outcome, ApplyOutcome::Delayed { .. }));
    assert_eq!(surface.icon_ranges(URI, "error"), vec![TextRange::whole_lines(1, 1)]);
}

#[test]
fn test_obsolete_with_verifying_applies_and_animates() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();

    let outcome = view.on_verification_diagnostics(
        &update(&[VerifiedObsolete, VerifiedVerifying, Scheduled], vec![]),
        &mut surface,
        now,
    );
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert!(view.is_animating());
    assert_eq!(
        surface.icon_ranges(URI, "verified-verifying"),
        vec![TextRange::whole_lines(1, 1)]
    );
}

#[test]
fn test_newer_update_replaces_held_one() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[Verified, ResolutionError, Verified], vec![]),
        &mut surface,
        now,
    );

    let later = now + Duration::from_millis(500);
    let outcome = view.on_verification_diagnostics(
        &update(&[Verified, Error, Verified], vec![]),
        &mut surface,
        later,
    );
    assert_eq!(outcome, ApplyOutcome::Applied);
    assert_eq!(view.poll(&mut surface, now + DELAY), RenderWork::Idle);
    assert!(surface.icon_ranges(URI, "resolution-error").is_empty());
    assert_eq!(surface.icon_ranges(URI, "error"), vec![TextRange::whole_lines(1, 1)]);
}

#[test]
fn test_every_update_stops_animation() {
    let (mut view, mut surface) = open_view(TEXT);
    let now = start();
    view.on_verification_diagnostics(
        &update(&[VerifiedVerifying, Verified, Verified], vec![]),
        &mut surface,
        now,
    );
    assert!(view.is_animating());

    view.on_verification_diagnostics(
        &update(&[VerifiedObsolete, Verified, Verified], vec![]),
        &mut surface,
        now,
    );
    assert!(!view.is_animating());
}
