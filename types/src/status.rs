//! Per-line verification status codes.

/// Verification outcome of a single source line.
///
/// Codes `0..=12` are sent by the verifier. The `ErrorRangeStart*` and
/// `ErrorRangeEnd*` variants are cosmetic: they are derived on the client
/// side to mark where an error range begins and ends, and are never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LineStatus {
    /// Default value for every line, before the verifier figures it out.
    #[default]
    Unknown = 0,
    /// First-time computation, not running yet but queued.
    Scheduled = 1,
    /// First-time computation, actively running.
    Verifying = 2,
    VerifiedObsolete = 3,
    VerifiedVerifying = 4,
    /// Also applicable for empty lines that are not surrounded by errors.
    Verified = 5,
    /// Containers of other diagnostics (e.g. a method body holding a failing assertion).
    ErrorRangeObsolete = 6,
    ErrorRangeVerifying = 7,
    ErrorRange = 8,
    /// Lines that carry an error themselves.
    ErrorObsolete = 9,
    ErrorVerifying = 10,
    Error = 11,
    /// Lines containing parse or resolution errors.
    ResolutionError = 12,
    ErrorRangeStartObsolete = 13,
    ErrorRangeStartVerifying = 14,
    ErrorRangeStart = 15,
    ErrorRangeEndObsolete = 16,
    ErrorRangeEndVerifying = 17,
    ErrorRangeEnd = 18,
}

impl LineStatus {
    /// Number of status kinds, i.e. the number of buckets in a range set.
    pub const COUNT: usize = 19;

    /// Every status, in code order.
    pub const ALL: [LineStatus; Self::COUNT] = [
        Self::Unknown,
        Self::Scheduled,
        Self::Verifying,
        Self::VerifiedObsolete,
        Self::VerifiedVerifying,
        Self::Verified,
        Self::ErrorRangeObsolete,
        Self::ErrorRangeVerifying,
        Self::ErrorRange,
        Self::ErrorObsolete,
        Self::ErrorVerifying,
        Self::Error,
        Self::ResolutionError,
        Self::ErrorRangeStartObsolete,
        Self::ErrorRangeStartVerifying,
        Self::ErrorRangeStart,
        Self::ErrorRangeEndObsolete,
        Self::ErrorRangeEndVerifying,
        Self::ErrorRangeEnd,
    ];

    /// Statuses computed before the latest edit.
    pub const OBSOLETE: [LineStatus; 5] = [
        Self::ErrorObsolete,
        Self::VerifiedObsolete,
        Self::ErrorRangeObsolete,
        Self::ErrorRangeStartObsolete,
        Self::ErrorRangeEndObsolete,
    ];

    /// Statuses of lines currently being (re-)checked. These are animated.
    pub const VERIFYING: [LineStatus; 6] = [
        Self::Verifying,
        Self::VerifiedVerifying,
        Self::ErrorVerifying,
        Self::ErrorRangeVerifying,
        Self::ErrorRangeStartVerifying,
        Self::ErrorRangeEndVerifying,
    ];

    /// Convert from the numeric wire code.
    ///
    /// Returns `None` for codes outside `0..COUNT`.
    /// Callers (boundary code) decide the fallback policy.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Bucket index in a per-status range set.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the line carries no error of any kind (verified, pending or unknown).
    #[must_use]
    pub fn is_non_error(self) -> bool {
        matches!(
            self,
            Self::Scheduled
                | Self::Unknown
                | Self::Verified
                | Self::VerifiedObsolete
                | Self::VerifiedVerifying
                | Self::Verifying
        )
    }

    #[must_use]
    pub fn is_obsolete(self) -> bool {
        Self::OBSOLETE.contains(&self)
    }

    #[must_use]
    pub fn is_verifying(self) -> bool {
        Self::VERIFYING.contains(&self)
    }

    /// The `ErrorRangeStart*` counterpart of a bare error-range status.
    #[must_use]
    pub fn range_start(self) -> Option<Self> {
        match self {
            Self::ErrorRange => Some(Self::ErrorRangeStart),
            Self::ErrorRangeObsolete => Some(Self::ErrorRangeStartObsolete),
            Self::ErrorRangeVerifying => Some(Self::ErrorRangeStartVerifying),
            _ => None,
        }
    }

    /// The `ErrorRangeEnd*` counterpart of a bare error-range status.
    #[must_use]
    pub fn range_end(self) -> Option<Self> {
        match self {
            Self::ErrorRange => Some(Self::ErrorRangeEnd),
            Self::ErrorRangeObsolete => Some(Self::ErrorRangeEndObsolete),
            Self::ErrorRangeVerifying => Some(Self::ErrorRangeEndVerifying),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Scheduled => "scheduled",
            Self::Verifying => "verifying",
            Self::VerifiedObsolete => "verified-obsolete",
            Self::VerifiedVerifying => "verified-verifying",
            Self::Verified => "verified",
            Self::ErrorRangeObsolete => "error-range-obsolete",
            Self::ErrorRangeVerifying => "error-range-verifying",
            Self::ErrorRange => "error-range",
            Self::ErrorObsolete => "error-obsolete",
            Self::ErrorVerifying => "error-verifying",
            Self::Error => "error",
            Self::ResolutionError => "resolution-error",
            Self::ErrorRangeStartObsolete => "error-range-start-obsolete",
            Self::ErrorRangeStartVerifying => "error-range-start-verifying",
            Self::ErrorRangeStart => "error-range-start",
            Self::ErrorRangeEndObsolete => "error-range-end-obsolete",
            Self::ErrorRangeEndVerifying => "error-range-end-verifying",
            Self::ErrorRangeEnd => "error-range-end",
        }
    }
}
