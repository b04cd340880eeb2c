//! Engine - wires up and runs the scan actors
//!
//! ```text
//! TextSource ──events──▶ ScanTrigger ──Rescan──▶ ScanCoordinator ──▶ HighlightSurface
//!                                                     │
//! EngineHandle ──activate/deactivate/select───────────┘──▶ watch<PanelState>
//! ```
//!
//! The engine is a thin orchestrator: it creates the channels, spawns both
//! actors on the current tokio runtime and hands back an [`EngineHandle`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::coordinator::ScanCoordinator;
use super::highlight::{HighlightSync, LineResolver};
use super::messages::CoordinatorMsg;
use super::trigger::{DEBOUNCE_MS, ScanTrigger};
use crate::core::{Occurrence, OccurrenceId, PanelState};
use crate::encoding::{EncodingCapability, StandardEncodings};
use crate::scanner::CompatibilityScanner;
use crate::source::{HighlightSurface, TextSource};

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

/// How long shutdown waits for the actors to wind down
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// Engine builder
pub struct Engine {
    source: Arc<dyn TextSource>,
    surface: Box<dyn HighlightSurface>,
    provider: Arc<dyn EncodingCapability>,
    debounce: Duration,
}

impl Engine {
    pub fn new(source: Arc<dyn TextSource>, surface: impl HighlightSurface + 'static) -> Self {
        Self {
            source,
            surface: Box::new(surface),
            provider: Arc::new(StandardEncodings::default()),
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }

    /// Set the quiet window edits are coalesced over
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the capability provider
    pub fn with_provider(mut self, provider: Arc<dyn EncodingCapability>) -> Self {
        self.provider = provider;
        self
    }

    /// Spawn both actors. The engine starts inactive.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> EngineHandle {
        let (coordinator_tx, coordinator_rx) = mpsc::channel(CHANNEL_BUFFER);
        let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PanelState::default());

        let trigger = ScanTrigger::new(trigger_rx, coordinator_tx.clone(), self.debounce);
        let coordinator = ScanCoordinator::new(
            coordinator_rx,
            trigger_tx,
            Arc::clone(&self.source),
            CompatibilityScanner::new(self.provider),
            HighlightSync::new(self.surface),
            state_tx,
        );

        crate::debug!("engine"; "start (debounce {:?})", self.debounce);
        let tasks = vec![
            tokio::spawn(async move { trigger.run().await }),
            tokio::spawn(async move { coordinator.run().await }),
        ];

        EngineHandle {
            tx: coordinator_tx,
            state: state_rx,
            lines: LineResolver::new(self.source),
            tasks,
        }
    }
}

/// Client side of a running engine.
pub struct EngineHandle {
    tx: mpsc::Sender<CoordinatorMsg>,
    state: watch::Receiver<PanelState>,
    lines: LineResolver,
    tasks: Vec<JoinHandle<()>>,
}

impl EngineHandle {
    /// Start listening to the source. Fires an immediate scan.
    pub async fn activate(&self) -> Result<()> {
        self.send(CoordinatorMsg::Activate).await
    }

    /// Stop listening, cancel in-flight work and clear all highlights.
    pub async fn deactivate(&self) -> Result<()> {
        self.send(CoordinatorMsg::Deactivate).await
    }

    /// Select an occurrence in the editor.
    ///
    /// Returns `false` when the id does not belong to the current result or
    /// its range no longer fits the buffer.
    pub async fn select(&self, id: OccurrenceId) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(CoordinatorMsg::Select {
            id,
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| anyhow!("scan engine stopped"))
    }

    /// Latest published panel state.
    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.clone()
    }

    /// 1-based line of an occurrence in the live buffer.
    pub fn line_number(&self, occurrence: &Occurrence) -> usize {
        self.lines.line_number(occurrence)
    }

    /// 1-based (line, column) of an occurrence in the live buffer.
    pub fn location(&self, occurrence: &Occurrence) -> (usize, usize) {
        self.lines.location(occurrence)
    }

    /// Deactivate and stop both actors.
    pub async fn shutdown(self) {
        crate::debug!("engine"; "sending shutdown");
        let _ = self.tx.send(CoordinatorMsg::Shutdown).await;

        let wait = join_all(self.tasks);
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, wait).await.is_err() {
            crate::debug!("engine"; "actors did not stop in {:?}", SHUTDOWN_TIMEOUT);
        }
        crate::debug!("engine"; "stopped");
    }

    async fn send(&self, msg: CoordinatorMsg) -> Result<()> {
        self.tx
            .send(msg)
            .await
            .map_err(|_| anyhow!("scan engine stopped"))
    }
}

async fn join_all(tasks: Vec<JoinHandle<()>>) {
    for task in tasks {
        let _ = task.await;
    }
}
