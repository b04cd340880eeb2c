//! Scan Coordinator - owns the scan lifecycle
//!
//! The coordinator task is the single context that touches the editor
//! surface. It:
//! - Registers/unregisters the source subscription on activate/deactivate
//! - Starts a new generation for every rescan pulse
//! - Runs scan bodies on the blocking pool over immutable snapshots
//! - Commits only the current generation's result, computed from the
//!   current text version
//!
//! ```text
//! Rescan ──▶ begin(g) ──▶ snapshot ──▶ spawn_blocking(scan) ──▶ ScanDone(g)
//!                                                                   │
//!            publish ◀── HighlightSync::apply ◀── judge(g) == Current
//! ```

mod generation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tokio::sync::{mpsc, watch};

use super::highlight::HighlightSync;
use super::messages::{CoordinatorMsg, ScanDone, TriggerMsg};
use crate::core::{OccurrenceId, PanelState, ScanError, ScanResult};
use crate::scanner::{CancelFlag, CompatibilityScanner};
use crate::source::{EventSink, SubscriptionId, TextSnapshot, TextSource};

use generation::{GenerationTracker, Verdict};

/// The scan currently in flight.
struct RunningScan {
    generation: u64,
    cancel: CancelFlag,
}

pub struct ScanCoordinator {
    rx: mpsc::Receiver<CoordinatorMsg>,
    trigger_tx: mpsc::UnboundedSender<TriggerMsg>,
    done_tx: mpsc::UnboundedSender<ScanDone>,
    done_rx: mpsc::UnboundedReceiver<ScanDone>,
    source: Arc<dyn TextSource>,
    scanner: CompatibilityScanner,
    highlight: HighlightSync,
    generations: GenerationTracker,
    running: Option<RunningScan>,
    /// Present while active
    subscription: Option<SubscriptionId>,
    state_tx: watch::Sender<PanelState>,
    /// Unsupported encodings already reported
    reported: FxHashSet<String>,
}

impl ScanCoordinator {
    pub fn new(
        rx: mpsc::Receiver<CoordinatorMsg>,
        trigger_tx: mpsc::UnboundedSender<TriggerMsg>,
        source: Arc<dyn TextSource>,
        scanner: CompatibilityScanner,
        highlight: HighlightSync,
        state_tx: watch::Sender<PanelState>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            rx,
            trigger_tx,
            done_tx,
            done_rx,
            source,
            scanner,
            highlight,
            generations: GenerationTracker::new(),
            running: None,
            subscription: None,
            state_tx,
            reported: FxHashSet::default(),
        }
    }

    /// Main event loop
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased; // Pulses are handled before completions that raced them

                msg = self.rx.recv() => match msg {
                    Some(CoordinatorMsg::Shutdown) | None => break,
                    Some(msg) => self.dispatch(msg),
                },

                Some(done) = self.done_rx.recv() => self.on_scan_done(done),
            }
        }

        self.deactivate();
        let _ = self.trigger_tx.send(TriggerMsg::Shutdown);
        crate::debug!("coordinator"; "stopped");
    }

    fn dispatch(&mut self, msg: CoordinatorMsg) {
        match msg {
            CoordinatorMsg::Activate => self.activate(),
            CoordinatorMsg::Deactivate => self.deactivate(),
            CoordinatorMsg::Rescan if self.is_active() => self.start_scan(),
            CoordinatorMsg::Rescan => {
                crate::debug!("coordinator"; "rescan while inactive ignored");
            }
            CoordinatorMsg::Select { id, reply } => {
                let selected = self.select(id);
                if let Some(reply) = reply {
                    let _ = reply.send(selected);
                }
            }
            CoordinatorMsg::Shutdown => {}
        }
    }

    #[inline]
    fn is_active(&self) -> bool {
        self.subscription.is_some()
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

impl ScanCoordinator {
    fn activate(&mut self) {
        if self.is_active() {
            return;
        }

        let sink = EventSink::new(self.trigger_tx.clone());
        self.subscription = Some(self.source.subscribe(sink));

        let encoding = self.source.encoding();
        crate::debug!("coordinator"; "activate ({})", encoding);
        let _ = self.trigger_tx.send(TriggerMsg::Activate { encoding });
    }

    /// Tear down: unregister, stop the trigger, cancel work, clear everything.
    fn deactivate(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };

        self.source.unsubscribe(subscription);
        let _ = self.trigger_tx.send(TriggerMsg::Deactivate);

        if let Some(running) = self.running.take() {
            running.cancel.cancel();
        }
        if let Some(generation) = self.generations.retire() {
            crate::debug!("coordinator"; "generation {} retired", generation);
        }

        self.highlight.clear();
        self.publish(false);
        crate::debug!("coordinator"; "deactivated");
    }

    fn select(&mut self, id: OccurrenceId) -> bool {
        if !self.is_active() {
            return false;
        }
        self.highlight.select(id, self.source.len_chars())
    }
}

// =============================================================================
// Scanning
// =============================================================================

impl ScanCoordinator {
    fn start_scan(&mut self) {
        let (generation, superseded) = self.generations.begin();
        if let Some(old) = self.running.take() {
            old.cancel.cancel();
        }
        if let Some(old) = superseded {
            crate::debug!("coordinator"; "generation {} superseded by {}", old, generation);
        }

        self.publish(true);

        let snapshot = match self.source.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                self.on_scan_done(ScanDone {
                    generation,
                    version: self.source.version(),
                    encoding: self.source.encoding(),
                    outcome: Err(error),
                });
                return;
            }
        };

        let cancel = CancelFlag::new();
        self.running = Some(RunningScan {
            generation,
            cancel: cancel.clone(),
        });
        spawn_scan(
            self.scanner.clone(),
            snapshot,
            generation,
            cancel,
            self.done_tx.clone(),
        );
    }

    fn on_scan_done(&mut self, done: ScanDone) {
        if self.generations.judge(done.generation) == Verdict::Superseded {
            crate::debug!("coordinator"; "discarding generation {}", done.generation);
            return;
        }

        if self
            .running
            .as_ref()
            .is_some_and(|running| running.generation == done.generation)
        {
            self.running = None;
        }

        let ScanDone {
            generation,
            version,
            encoding,
            outcome,
        } = done;

        let result = match outcome {
            Ok(occurrences) => {
                let current = self.source.version();
                if version != current {
                    // The edit that bumped the version has a rescan pending
                    crate::debug!(
                        "coordinator";
                        "generation {} read version {}, buffer is at {}",
                        generation, version, current
                    );
                    return;
                }
                ScanResult {
                    generation,
                    version,
                    encoding,
                    occurrences,
                }
            }
            Err(error) if error.is_cancelled() => {
                crate::debug!("coordinator"; "generation {} cancelled", generation);
                return;
            }
            Err(ScanError::EncodingUnsupported(label)) => {
                if self.reported.insert(label.clone()) {
                    crate::log!("scan"; "encoding `{}` is not supported, nothing to report", label);
                }
                ScanResult::empty(generation, version, encoding)
            }
            Err(ScanError::SourceUnavailable) => {
                crate::debug!("coordinator"; "source closed during generation {}", generation);
                ScanResult::empty(generation, version, encoding)
            }
            Err(error) => {
                crate::log!("scan"; "{}", error);
                ScanResult::empty(generation, version, encoding)
            }
        };

        self.commit(result);
    }

    fn commit(&mut self, result: ScanResult) {
        if !self.generations.accept(result.generation) {
            return;
        }
        crate::debug!(
            "coordinator";
            "generation {} committed: {} occurrence(s)",
            result.generation, result.len()
        );
        self.highlight.apply(Arc::new(result));
        self.publish(false);
    }

    fn publish(&self, is_scanning: bool) {
        self.state_tx.send_replace(PanelState {
            is_scanning,
            result: Arc::clone(self.highlight.current()),
        });
    }
}

/// Run one scan body on the blocking pool and report back.
fn spawn_scan(
    scanner: CompatibilityScanner,
    snapshot: TextSnapshot,
    generation: u64,
    cancel: CancelFlag,
    done_tx: mpsc::UnboundedSender<ScanDone>,
) {
    let TextSnapshot {
        text,
        version,
        encoding,
    } = snapshot;

    tokio::spawn(async move {
        let label = encoding.clone();
        let result = tokio::task::spawn_blocking(move || {
            scanner.scan_label(&text, &label, generation, &cancel)
        })
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                crate::debug!("coordinator"; "spawn_blocking error: {}", e);
                Err(ScanError::Internal(e.to_string()))
            }
        };

        let _ = done_tx.send(ScanDone {
            generation,
            version,
            encoding,
            outcome,
        });
    });
}
