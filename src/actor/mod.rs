//! Actor System for Background Scanning
//!
//! Message-passing concurrency between the text source and the editor:
//!
//! ```text
//! TextSource --> ScanTrigger --> ScanCoordinator --> HighlightSurface
//! (events)       (debounce)      (generations)       (decorations)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `trigger` - Edit/encoding event merging with debouncing
//! - `coordinator` - Scan lifecycle, cancellation and commit check
//! - `highlight` - Editor decorations and selection
//! - `engine` - Wires up and runs actors

pub mod coordinator;
pub mod engine;
pub mod highlight;
pub mod messages;
pub mod trigger;

pub use coordinator::ScanCoordinator;
pub use engine::{Engine, EngineHandle};
pub use highlight::{HighlightSync, LineResolver};
pub use trigger::ScanTrigger;
