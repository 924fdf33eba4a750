//! Range compaction: per-line statuses → one list of line ranges per status.

use std::array;

use veriscope_types::{LineStatus, TextRange};

/// Line ranges bucketed by status.
///
/// Built by [`compact`]: ranges inside a bucket are sorted and disjoint,
/// and all buckets together partition the document's lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRanges {
    buckets: [Vec<TextRange>; LineStatus::COUNT],
}

impl Default for StatusRanges {
    fn default() -> Self {
        Self {
            buckets: array::from_fn(|_| Vec::new()),
        }
    }
}

impl StatusRanges {
    /// Ranges painted with `status`.
    #[must_use]
    pub fn get(&self, status: LineStatus) -> &[TextRange] {
        &self.buckets[status.index()]
    }

    #[must_use]
    pub fn has(&self, status: LineStatus) -> bool {
        !self.get(status).is_empty()
    }

    /// Whether any of `statuses` has at least one range.
    #[must_use]
    pub fn has_any(&self, statuses: &[LineStatus]) -> bool {
        statuses.iter().any(|&status| self.has(status))
    }

    #[must_use]
    pub fn has_resolution_errors(&self) -> bool {
        self.has(LineStatus::ResolutionError)
    }

    #[must_use]
    pub fn has_obsolete(&self) -> bool {
        self.has_any(&LineStatus::OBSOLETE)
    }

    #[must_use]
    pub fn has_verifying(&self) -> bool {
        self.has_any(&LineStatus::VERIFYING)
    }

    /// No line is queued, stale or being checked.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.has(LineStatus::Scheduled) && !self.has_obsolete() && !self.has_verifying()
    }

    /// Buckets in status-code order.
    pub fn iter(&self) -> impl Iterator<Item = (LineStatus, &[TextRange])> {
        LineStatus::ALL
            .iter()
            .map(|&status| (status, self.get(status)))
    }

    /// Status of `line`, if some range covers it.
    #[must_use]
    pub fn status_at(&self, line: u32) -> Option<LineStatus> {
        self.iter().find_map(|(status, ranges)| {
            ranges
                .iter()
                .any(|range| range.contains_line(line))
                .then_some(status)
        })
    }

    /// Total number of lines covered.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.buckets
            .iter()
            .flatten()
            .map(|range| (range.end.line - range.start.line) as usize + 1)
            .sum()
    }

    fn push(&mut self, status: LineStatus, range: TextRange) {
        self.buckets[status.index()].push(range);
    }
}

/// Collapse a per-line status array into contiguous whole-line runs.
///
/// A virtual line past the end flushes the last run, so every line lands in
/// exactly one range.
#[must_use]
pub fn compact(statuses: &[LineStatus]) -> StatusRanges {
    let mut ranges = StatusRanges::default();
    let mut run: Option<(LineStatus, usize)> = None;

    let lines = statuses.iter().copied().map(Some).chain([None]);
    for (line, status) in lines.enumerate() {
        match run {
            Some((run_status, _)) if Some(run_status) == status => {}
            Some((run_status, run_start)) => {
                ranges.push(
                    run_status,
                    TextRange::whole_lines(run_start as u32, line as u32 - 1),
                );
                run = status.map(|s| (s, line));
            }
            None => run = status.map(|s| (s, line)),
        }
    }

    ranges
}
