use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use super::ScanCoordinator;
use crate::actor::highlight::HighlightSync;
use crate::actor::messages::{CoordinatorMsg, ScanDone, TriggerMsg};
use crate::core::{CharRange, Occurrence, OccurrenceId, PanelState, ScanState};
use crate::encoding::StandardEncodings;
use crate::scanner::CompatibilityScanner;
use crate::source::{MemoryDocument, RecordingSurface, TextSource};

struct Fixture {
    coordinator: ScanCoordinator,
    doc: Arc<MemoryDocument>,
    surface: RecordingSurface,
    state: watch::Receiver<PanelState>,
    trigger_rx: mpsc::UnboundedReceiver<TriggerMsg>,
    _tx: mpsc::Sender<CoordinatorMsg>,
}

impl Fixture {
    fn new(text: &str, encoding: &str) -> Self {
        let doc = Arc::new(MemoryDocument::new(text, encoding));
        let surface = RecordingSurface::new();
        let (tx, rx) = mpsc::channel(32);
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(PanelState::default());

        let coordinator = ScanCoordinator::new(
            rx,
            trigger_tx,
            Arc::clone(&doc) as Arc<dyn TextSource>,
            CompatibilityScanner::new(Arc::new(StandardEncodings::default())),
            HighlightSync::new(Box::new(surface.clone())),
            state_tx,
        );

        Self {
            coordinator,
            doc,
            surface,
            state,
            trigger_rx,
            _tx: tx,
        }
    }

    fn activated(text: &str, encoding: &str) -> Self {
        let mut fixture = Self::new(text, encoding);
        fixture.coordinator.dispatch(CoordinatorMsg::Activate);
        fixture
    }

    async fn next_done(&mut self) -> ScanDone {
        self.coordinator.done_rx.recv().await.unwrap()
    }

    /// Rescan and commit whatever the scan reports.
    async fn scan(&mut self) {
        self.coordinator.dispatch(CoordinatorMsg::Rescan);
        let done = self.next_done().await;
        self.coordinator.on_scan_done(done);
    }

    fn panel(&self) -> PanelState {
        self.state.borrow().clone()
    }

    async fn select(&mut self, id: OccurrenceId) -> bool {
        let (reply, rx) = oneshot::channel();
        self.coordinator.dispatch(CoordinatorMsg::Select {
            id,
            reply: Some(reply),
        });
        rx.await.unwrap()
    }
}

fn ranges(panel: &PanelState) -> Vec<CharRange> {
    panel.occurrences().iter().map(|o| o.range).collect()
}

#[tokio::test]
async fn test_activate_subscribes_and_starts_trigger() {
    let mut fixture = Fixture::activated("abc", "shift_jis");

    assert_eq!(fixture.doc.subscriber_count(), 1);
    match fixture.trigger_rx.try_recv() {
        Ok(TriggerMsg::Activate { encoding }) => assert_eq!(encoding, "shift_jis"),
        other => panic!("unexpected {other:?}"),
    }

    // A second activate is a no-op
    fixture.coordinator.dispatch(CoordinatorMsg::Activate);
    assert_eq!(fixture.doc.subscriber_count(), 1);
    assert!(fixture.trigger_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_scan_commits_and_highlights() {
    let mut fixture = Fixture::activated("a~b\\c", "shift_jis");

    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);
    assert!(fixture.panel().is_scanning);

    let done = fixture.next_done().await;
    fixture.coordinator.on_scan_done(done);

    let panel = fixture.panel();
    assert!(!panel.is_scanning);
    assert_eq!(panel.result.generation, 1);
    assert_eq!(ranges(&panel), vec![CharRange::new(1, 2), CharRange::new(3, 4)]);
    assert_eq!(panel.summary(), "Found 2 incompatible characters.");
    assert_eq!(fixture.surface.log().highlights, ranges(&panel));
    assert_eq!(fixture.coordinator.generations.state(), ScanState::Idle);
}

#[tokio::test]
async fn test_rescan_while_inactive_is_ignored() {
    let mut fixture = Fixture::new("~", "shift_jis");
    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);

    assert_eq!(fixture.coordinator.generations.state(), ScanState::Idle);
    assert!(!fixture.panel().is_scanning);
}

#[tokio::test]
async fn test_late_superseded_result_is_discarded() {
    let mut fixture = Fixture::activated("~~", "shift_jis");

    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);
    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);

    let mut done = vec![fixture.next_done().await, fixture.next_done().await];
    done.sort_by_key(|d| std::cmp::Reverse(d.generation));
    for d in done {
        fixture.coordinator.on_scan_done(d);
    }
    assert_eq!(fixture.panel().result.generation, 2);

    // Even a completed generation 1 arriving now must not replace it
    let bogus = Occurrence {
        id: OccurrenceId {
            generation: 1,
            index: 0,
        },
        range: CharRange::new(0, 1),
        character: "~".to_string(),
        substitute: None,
    };
    fixture.coordinator.on_scan_done(ScanDone {
        generation: 1,
        version: fixture.doc.version(),
        encoding: "shift_jis".to_string(),
        outcome: Ok(vec![bogus]),
    });

    let panel = fixture.panel();
    assert_eq!(panel.result.generation, 2);
    assert_eq!(panel.count(), 2);
    assert_eq!(fixture.coordinator.generations.accepted(), Some(2));
}

#[tokio::test]
async fn test_deactivate_mid_scan_clears_everything() {
    let mut fixture = Fixture::activated("~", "shift_jis");
    fixture.scan().await;
    assert_eq!(fixture.panel().count(), 1);

    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);
    fixture.coordinator.dispatch(CoordinatorMsg::Deactivate);

    let panel = fixture.panel();
    assert!(!panel.is_scanning);
    assert_eq!(panel.count(), 0);
    assert!(fixture.surface.log().highlights.is_empty());
    assert_eq!(fixture.doc.subscriber_count(), 0);
    assert_eq!(fixture.coordinator.generations.state(), ScanState::Superseded(2));

    // The in-flight scan finishes afterwards and is dropped
    let done = fixture.next_done().await;
    fixture.coordinator.on_scan_done(done);
    assert_eq!(fixture.panel().count(), 0);
    assert!(fixture.surface.log().highlights.is_empty());
    assert_eq!(fixture.coordinator.generations.state(), ScanState::Idle);

    let lifecycle: Vec<_> = std::iter::from_fn(|| fixture.trigger_rx.try_recv().ok()).collect();
    assert!(matches!(lifecycle.last(), Some(TriggerMsg::Deactivate)));
}

#[tokio::test]
async fn test_stale_version_is_not_committed() {
    let mut fixture = Fixture::activated("~", "shift_jis");

    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);
    let done = fixture.next_done().await;
    fixture.doc.insert(0, "~");
    fixture.coordinator.on_scan_done(done);

    // Still waiting for the rescan the edit scheduled
    assert!(fixture.panel().is_scanning);
    assert_eq!(fixture.coordinator.generations.state(), ScanState::Scanning(1));
    assert!(fixture.coordinator.generations.state().is_scanning());
    assert!(fixture.surface.log().highlights.is_empty());

    fixture.scan().await;
    let panel = fixture.panel();
    assert!(!panel.is_scanning);
    assert_eq!(ranges(&panel), vec![CharRange::new(0, 1), CharRange::new(1, 2)]);
}

#[tokio::test]
async fn test_unsupported_encoding_commits_empty_result() {
    let mut fixture = Fixture::activated("~", "x-no-such-encoding");

    fixture.scan().await;
    let panel = fixture.panel();
    assert!(!panel.is_scanning);
    assert_eq!(panel.count(), 0);
    assert_eq!(panel.result.encoding, "x-no-such-encoding");
    assert_eq!(panel.summary(), "No issues found.");

    // Reported once per label
    fixture.scan().await;
    assert_eq!(fixture.coordinator.reported.len(), 1);
}

#[tokio::test]
async fn test_closed_source_commits_empty_result() {
    let mut fixture = Fixture::activated("~", "shift_jis");
    fixture.scan().await;
    assert_eq!(fixture.panel().count(), 1);

    fixture.doc.close();
    fixture.coordinator.dispatch(CoordinatorMsg::Rescan);

    // Committed synchronously, nothing was spawned
    let panel = fixture.panel();
    assert!(!panel.is_scanning);
    assert_eq!(panel.count(), 0);
    assert!(fixture.surface.log().highlights.is_empty());
}

#[tokio::test]
async fn test_select_follows_buffer_length() {
    let mut fixture = Fixture::activated("ab~", "shift_jis");
    fixture.scan().await;

    let id = fixture.panel().occurrences()[0].id;
    assert!(fixture.select(id).await);
    assert_eq!(fixture.surface.log().selection, Some(CharRange::new(2, 3)));

    // Shrunk below the occurrence: the row stays but selecting does nothing
    fixture.doc.delete(1..3);
    assert!(!fixture.select(id).await);
    assert_eq!(fixture.surface.log().selection, Some(CharRange::new(2, 3)));
}

#[tokio::test]
async fn test_select_while_inactive_is_ignored() {
    let mut fixture = Fixture::new("~", "shift_jis");
    let id = OccurrenceId {
        generation: 1,
        index: 0,
    };
    assert!(!fixture.select(id).await);
}
