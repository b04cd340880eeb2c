//! Collaborator seams: the live text buffer and its editor surface.
//!
//! The engine never owns the buffer. It reads frozen snapshots from a
//! [`TextSource`], listens to its change events through an [`EventSink`],
//! and paints onto a [`HighlightSurface`] from the coordinator task only.

mod lines;
mod memory;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::actor::messages::TriggerMsg;
use crate::core::{CharRange, ScanError};

pub use lines::LineIndex;
pub use memory::{MemoryDocument, RecordingSurface, SurfaceLog};

/// Immutable, independently owned copy of the buffer.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    pub text: Arc<str>,
    /// Bumped on every character edit.
    pub version: u64,
    pub encoding: String,
}

/// Change notifications a source publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// Characters were inserted, removed or replaced.
    TextChanged,
    /// An edit touched attributes only (no characters).
    AttributesChanged,
    EncodingChanged(String),
}

/// Registration handle returned by [`TextSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Where a source delivers its events.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<TriggerMsg>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<TriggerMsg>) -> Self {
        Self { tx }
    }

    /// Deliver an event. Returns `false` once the receiver is gone.
    pub fn emit(&self, event: SourceEvent) -> bool {
        self.tx.send(TriggerMsg::Source(event)).is_ok()
    }
}

/// The live document, as seen by the engine.
pub trait TextSource: Send + Sync {
    /// Frozen copy of the current text.
    ///
    /// Fails with [`ScanError::SourceUnavailable`] once the document closed.
    fn snapshot(&self) -> Result<TextSnapshot, ScanError>;

    fn version(&self) -> u64;

    /// Current target encoding label.
    fn encoding(&self) -> String;

    /// Buffer length in characters.
    fn len_chars(&self) -> usize;

    /// 1-based (line, column) of `position`, columns counted in characters.
    fn location(&self, position: usize) -> (usize, usize);

    /// 1-based line containing `position`.
    fn line_number(&self, position: usize) -> usize {
        self.location(position).0
    }

    fn subscribe(&self, sink: EventSink) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Editor overlay and selection controller.
pub trait HighlightSurface: Send {
    fn clear_highlights(&mut self);

    fn highlight(&mut self, range: CharRange);

    /// Select `range` and scroll it into view.
    fn select(&mut self, range: CharRange);
}
