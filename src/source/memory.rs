//! In-memory document and surface.
//!
//! Backs the `watch` command and the engine tests. Text and version are
//! swapped together through `arc-swap`, so a snapshot can never pair new
//! text with an old version (or the reverse).

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::{
    EventSink, HighlightSurface, LineIndex, SourceEvent, SubscriptionId, TextSnapshot, TextSource,
};
use crate::core::{CharRange, ScanError};

#[derive(Debug)]
struct Revision {
    text: Arc<str>,
    version: u64,
}

/// A text buffer living in memory.
pub struct MemoryDocument {
    revision: ArcSwap<Revision>,
    encoding: ArcSwap<String>,
    closed: AtomicBool,
    subscribers: Mutex<FxHashMap<SubscriptionId, EventSink>>,
    next_subscription: AtomicU64,
    /// Serializes writers; readers go through `revision` without locking.
    edit_lock: Mutex<()>,
    /// Built on the first line lookup after each edit.
    lines: Mutex<Option<(u64, Arc<LineIndex>)>>,
}

impl MemoryDocument {
    pub fn new(text: &str, encoding: impl Into<String>) -> Self {
        Self {
            revision: ArcSwap::from_pointee(Revision {
                text: Arc::from(text),
                version: 0,
            }),
            encoding: ArcSwap::from_pointee(encoding.into()),
            closed: AtomicBool::new(false),
            subscribers: Mutex::new(FxHashMap::default()),
            next_subscription: AtomicU64::new(1),
            edit_lock: Mutex::new(()),
            lines: Mutex::new(None),
        }
    }

    pub fn text(&self) -> Arc<str> {
        Arc::clone(&self.revision.load().text)
    }

    /// Replace the whole text. A no-op (and no event) when unchanged.
    pub fn replace_all(&self, text: &str) {
        self.edit(|current| (current != text).then(|| text.to_string()));
    }

    /// Insert `s` at character position `at` (clamped to the end).
    pub fn insert(&self, at: usize, s: &str) {
        if s.is_empty() {
            return;
        }
        self.edit(|current| {
            let byte = byte_offset(current, at);
            let mut next = String::with_capacity(current.len() + s.len());
            next.push_str(&current[..byte]);
            next.push_str(s);
            next.push_str(&current[byte..]);
            Some(next)
        });
    }

    /// Remove the characters in `range` (clamped to the buffer).
    pub fn delete(&self, range: Range<usize>) {
        self.edit(|current| {
            let start = byte_offset(current, range.start);
            let end = byte_offset(current, range.end.max(range.start));
            if start == end {
                return None;
            }
            let mut next = String::with_capacity(current.len() - (end - start));
            next.push_str(&current[..start]);
            next.push_str(&current[end..]);
            Some(next)
        });
    }

    /// Report an attribute-only edit (styling, markers).
    pub fn touch_attributes(&self) {
        self.broadcast(SourceEvent::AttributesChanged);
    }

    pub fn set_encoding(&self, label: &str) {
        let changed = {
            let _guard = self.edit_lock.lock();
            if self.encoding.load().as_str() == label {
                false
            } else {
                self.encoding.store(Arc::new(label.to_string()));
                true
            }
        };
        if changed {
            self.broadcast(SourceEvent::EncodingChanged(label.to_string()));
        }
    }

    /// Close the document: later snapshots fail.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    fn edit(&self, apply: impl FnOnce(&str) -> Option<String>) {
        {
            let _guard = self.edit_lock.lock();
            let current = self.revision.load();
            let Some(next) = apply(current.text.as_ref()) else {
                return;
            };
            self.revision.store(Arc::new(Revision {
                text: Arc::from(next),
                version: current.version + 1,
            }));
        }
        self.broadcast(SourceEvent::TextChanged);
    }

    fn broadcast(&self, event: SourceEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|_, sink| sink.emit(event.clone()));
    }

    fn line_index(&self) -> Arc<LineIndex> {
        let revision = self.revision.load();
        let mut cached = self.lines.lock();
        match cached.as_ref() {
            Some((version, index)) if *version == revision.version => Arc::clone(index),
            _ => {
                let index = Arc::new(LineIndex::new(&revision.text));
                *cached = Some((revision.version, Arc::clone(&index)));
                index
            }
        }
    }
}

impl TextSource for MemoryDocument {
    fn snapshot(&self) -> Result<TextSnapshot, ScanError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ScanError::SourceUnavailable);
        }
        let revision = self.revision.load();
        Ok(TextSnapshot {
            text: Arc::clone(&revision.text),
            version: revision.version,
            encoding: self.encoding(),
        })
    }

    fn version(&self) -> u64 {
        self.revision.load().version
    }

    fn encoding(&self) -> String {
        self.encoding.load().as_str().to_string()
    }

    fn len_chars(&self) -> usize {
        self.revision.load().text.chars().count()
    }

    fn location(&self, position: usize) -> (usize, usize) {
        self.line_index().location(position)
    }

    fn subscribe(&self, sink: EventSink) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().insert(id, sink);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().remove(&id);
    }
}

/// Byte offset of character position `at`, clamped to the end.
fn byte_offset(text: &str, at: usize) -> usize {
    text.char_indices()
        .nth(at)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Everything a [`RecordingSurface`] was asked to do.
#[derive(Debug, Default, Clone)]
pub struct SurfaceLog {
    pub highlights: Vec<CharRange>,
    pub selection: Option<CharRange>,
    /// Number of clears that removed at least one highlight.
    pub clears: usize,
}

/// Surface that records instead of painting. Clones share one log.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> SurfaceLog {
        self.log.lock().clone()
    }
}

impl HighlightSurface for RecordingSurface {
    fn clear_highlights(&mut self) {
        let mut log = self.log.lock();
        if !log.highlights.is_empty() {
            log.clears += 1;
        }
        log.highlights.clear();
    }

    fn highlight(&mut self, range: CharRange) {
        self.log.lock().highlights.push(range);
    }

    fn select(&mut self, range: CharRange) {
        self.log.lock().selection = Some(range);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::actor::messages::TriggerMsg;

    fn subscribed(doc: &MemoryDocument) -> mpsc::UnboundedReceiver<TriggerMsg> {
        let (tx, rx) = mpsc::unbounded_channel();
        doc.subscribe(EventSink::new(tx));
        rx
    }

    #[test]
    fn test_edits_bump_version_and_notify() {
        let doc = MemoryDocument::new("hello", "shift_jis");
        let mut rx = subscribed(&doc);

        doc.insert(5, " world");
        doc.delete(0..1);
        assert_eq!(&*doc.text(), "ello world");
        assert_eq!(doc.version(), 2);

        assert!(matches!(rx.try_recv(), Ok(TriggerMsg::Source(SourceEvent::TextChanged))));
        assert!(matches!(rx.try_recv(), Ok(TriggerMsg::Source(SourceEvent::TextChanged))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_unchanged_replace_is_silent() {
        let doc = MemoryDocument::new("same", "utf-8");
        let mut rx = subscribed(&doc);

        doc.replace_all("same");
        assert_eq!(doc.version(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_character_positions() {
        let doc = MemoryDocument::new("日本語", "utf-8");
        doc.insert(1, "~");
        assert_eq!(&*doc.text(), "日~本語");
        assert_eq!(doc.len_chars(), 4);

        doc.delete(2..10);
        assert_eq!(&*doc.text(), "日~");
    }

    #[test]
    fn test_encoding_change_deduplicated() {
        let doc = MemoryDocument::new("", "utf-8");
        let mut rx = subscribed(&doc);

        doc.set_encoding("shift_jis");
        doc.set_encoding("shift_jis");

        match rx.try_recv() {
            Ok(TriggerMsg::Source(SourceEvent::EncodingChanged(label))) => {
                assert_eq!(label, "shift_jis");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
        assert_eq!(doc.encoding(), "shift_jis");
    }

    #[test]
    fn test_unsubscribe_and_dropped_receivers() {
        let doc = MemoryDocument::new("", "utf-8");
        let (tx, rx) = mpsc::unbounded_channel();
        let id = doc.subscribe(EventSink::new(tx));
        assert_eq!(doc.subscriber_count(), 1);

        doc.unsubscribe(id);
        assert_eq!(doc.subscriber_count(), 0);

        drop(rx);
        let _rx = subscribed(&doc);
        let (tx, rx) = mpsc::unbounded_channel();
        doc.subscribe(EventSink::new(tx));
        drop(rx);
        doc.insert(0, "x");
        assert_eq!(doc.subscriber_count(), 1);
    }

    #[test]
    fn test_closed_document_has_no_snapshot() {
        let doc = MemoryDocument::new("text", "utf-8");
        assert!(doc.snapshot().is_ok());
        doc.close();
        assert!(matches!(doc.snapshot(), Err(ScanError::SourceUnavailable)));
    }

    #[test]
    fn test_line_index_follows_edits() {
        let doc = MemoryDocument::new("a\nb", "utf-8");
        assert_eq!(doc.line_number(2), 2);

        doc.insert(0, "x\n");
        assert_eq!(doc.line_number(4), 3);
        assert_eq!(doc.location(4), (3, 1));
        assert_eq!(doc.location(1), (1, 2));
    }

    #[test]
    fn test_recording_surface() {
        let surface = RecordingSurface::new();
        let mut painter = surface.clone();

        painter.clear_highlights();
        assert_eq!(surface.log().clears, 0);

        painter.highlight(CharRange::new(0, 1));
        painter.select(CharRange::new(0, 1));
        painter.clear_highlights();

        let log = surface.log();
        assert_eq!(log.clears, 1);
        assert!(log.highlights.is_empty());
        assert_eq!(log.selection, Some(CharRange::new(0, 1)));
    }
}
