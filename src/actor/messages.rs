//! Actor Message Definitions
//!
//! ```text
//! TextSource --Source--> ScanTrigger --Rescan--> ScanCoordinator
//!                                                  │    ▲
//!                                       snapshot ──┘    └── ScanDone (blocking pool)
//! ```

use tokio::sync::oneshot;

use crate::core::{Occurrence, OccurrenceId, ScanError};
use crate::source::SourceEvent;

// =============================================================================
// ScanTrigger Messages
// =============================================================================

/// Messages to the trigger. Source events and lifecycle share one queue so
/// they are seen in arrival order.
#[derive(Debug)]
pub enum TriggerMsg {
    /// Event forwarded from the text source
    Source(SourceEvent),
    /// Start emitting; fires immediately
    Activate { encoding: String },
    /// Stop emitting and drop any pending debounce
    Deactivate,
    Shutdown,
}

// =============================================================================
// ScanCoordinator Messages
// =============================================================================

/// Messages to the coordinator.
#[derive(Debug)]
pub enum CoordinatorMsg {
    Activate,
    Deactivate,
    /// Rescan pulse from the trigger
    Rescan,
    /// Select an occurrence in the editor; replies whether it was selected
    Select {
        id: OccurrenceId,
        reply: Option<oneshot::Sender<bool>>,
    },
    Shutdown,
}

/// Outcome of one background scan, reported back to the coordinator.
#[derive(Debug)]
pub struct ScanDone {
    pub generation: u64,
    /// Text version the scan read
    pub version: u64,
    pub encoding: String,
    pub outcome: Result<Vec<Occurrence>, ScanError>,
}
