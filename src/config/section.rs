//! `[scan]`, `[trigger]` and `[report]` sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigDiagnostics, FieldPath};
use crate::actor::trigger::DEBOUNCE_MS;
use crate::encoding::TargetEncoding;

/// Accepted range for `trigger.debounce_ms`.
const DEBOUNCE_RANGE: std::ops::RangeInclusive<u64> = 1..=10_000;

// ============================================================================
// [scan]
// ============================================================================

/// Target encoding and substitute policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// WHATWG label of the target encoding
    pub encoding: String,

    /// Compute best-effort substitutes for reported characters
    pub substitutes: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            encoding: "shift_jis".to_string(),
            substitutes: true,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(e) = TargetEncoding::for_label(&self.encoding) {
            diag.error_with_hint(
                FieldPath::new("scan.encoding"),
                e.to_string(),
                "use a WHATWG label such as `shift_jis`, `euc-jp` or `windows-1252`",
            );
        }
    }
}

// ============================================================================
// [trigger]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TriggerConfig {
    /// Quiet window (ms) an edit burst must settle for before a rescan
    pub debounce_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

impl TriggerConfig {
    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !DEBOUNCE_RANGE.contains(&self.debounce_ms) {
            diag.error(
                FieldPath::new("trigger.debounce_ms"),
                format!(
                    "must be between {} and {}, got {}",
                    DEBOUNCE_RANGE.start(),
                    DEBOUNCE_RANGE.end(),
                    self.debounce_ms
                ),
            );
        }
    }
}

// ============================================================================
// [report]
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows printed by the CLI table; the rest are summarized
    pub max_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { max_rows: 200 }
    }
}

impl ReportConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max_rows == 0 {
            diag.error(FieldPath::new("report.max_rows"), "must be greater than 0");
        }
    }
}
