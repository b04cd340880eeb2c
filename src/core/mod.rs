//! Core types - pure data shared across the engine.

mod error;
mod occurrence;
mod result;
mod state;

pub use error::ScanError;
pub use occurrence::{CharRange, Occurrence, OccurrenceId};
pub use result::{PanelState, ScanResult, ScanState, SortKey, SortOrder};
pub use state::{register_shutdown, setup_shutdown_handler};
