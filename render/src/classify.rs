//! Cosmetic classification of per-line statuses.
//!
//! The verifier only reports that a line belongs to an error range. To draw
//! a bracket in the gutter the client also needs to know where each range
//! begins and ends. Two independent passes compute those boundaries:
//!
//! - the forward pass marks a range line whose predecessor is a non-error
//!   line as an `ErrorRangeStart*` line;
//! - the backward pass marks a range line whose successor is a non-error
//!   line as an `ErrorRangeEnd*` line.
//!
//! The overlays are merged by precedence (start, then end, then the raw
//! status), so a one-line range renders as a start. Lines before the first
//! and after the last line count as `Verified`.

use veriscope_types::LineStatus;

/// Rewrite bare error-range statuses into their start/end variants.
///
/// Pure and idempotent: start/end variants are never rewritten again.
#[must_use]
pub fn classify(raw: &[LineStatus]) -> Vec<LineStatus> {
    let starts = boundary_overlay(raw.iter().copied(), LineStatus::range_start);
    let mut ends = boundary_overlay(raw.iter().rev().copied(), LineStatus::range_end);
    ends.reverse();

    raw.iter()
        .zip(starts)
        .zip(ends)
        .map(|((&status, start), end)| start.or(end).unwrap_or(status))
        .collect()
}

/// One directional pass: `Some(marked)` where the previous line in scan
/// order is a non-error line and `mark` applies to the current one.
fn boundary_overlay(
    lines: impl Iterator<Item = LineStatus>,
    mark: fn(LineStatus) -> Option<LineStatus>,
) -> Vec<Option<LineStatus>> {
    let mut previous = LineStatus::Verified;
    lines
        .map(|status| {
            let marked = if previous.is_non_error() {
                mark(status)
            } else {
                None
            };
            previous = status;
            marked
        })
        .collect()
}
