//! Scan failure kinds.

use thiserror::Error;

/// Why a scan produced no result of its own.
///
/// Only [`ScanError::Cancelled`] is an expected outcome for the coordinator;
/// every other kind is converted into an empty result at the scan boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("scan cancelled")]
    Cancelled,

    #[error("encoding `{0}` is not supported")]
    EncodingUnsupported(String),

    #[error("text source is no longer available")]
    SourceUnavailable,

    #[error("scan task failed: {0}")]
    Internal(String),
}

impl ScanError {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
