//! incompat - find characters a text cannot keep in its target encoding.
//!
//! The engine watches a live text buffer and reports, per grapheme cluster,
//! every character the buffer's target encoding cannot represent:
//!
//! ```text
//! source ──▶ actor::trigger ──▶ actor::coordinator ──▶ scanner ──▶ encoding
//!                                       │
//!                                       └──▶ actor::highlight ──▶ editor
//! ```
//!
//! # Module Structure
//!
//! - `core` - Occurrences, results, errors
//! - `encoding` - Target encodings and capability providers
//! - `scanner` - Grapheme scan with cooperative cancellation
//! - `source` - Text source / highlight surface seams, in-memory document
//! - `actor` - Trigger, coordinator, highlight sync, engine handle
//! - `config` - `incompat.toml`
//! - `cli` - `scan` and `watch` commands

pub mod actor;
pub mod cli;
pub mod config;
pub mod core;
pub mod encoding;
pub mod logger;
pub mod scanner;
pub mod source;

pub use actor::{Engine, EngineHandle};
pub use crate::core::{CharRange, Occurrence, OccurrenceId, PanelState, ScanError, ScanResult};
pub use encoding::{EncodingCapability, StandardEncodings, TargetEncoding};
pub use scanner::{CancelFlag, CompatibilityScanner};
pub use source::{HighlightSurface, MemoryDocument, TextSource};
