//! Scan Trigger
//!
//! Merges source events and lifecycle messages into one stream of rescan
//! pulses for the coordinator.
//!
//! ```text
//! TextChanged ──▶ Debouncer (quiet window) ──┐
//! EncodingChanged (deduplicated) ────────────┼──▶ Rescan
//! Activate ──────────────────────────────────┘
//! ```

mod debouncer;


use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::messages::{CoordinatorMsg, TriggerMsg};
use crate::source::SourceEvent;

use debouncer::Debouncer;

pub(crate) use debouncer::DEBOUNCE_MS;

/// What handling one message asks the loop to do.
enum Flow {
    Continue,
    Fire(&'static str),
    Stop,
}

/// Trigger actor - coalesces edits, passes encoding/activation through.
pub struct ScanTrigger {
    rx: mpsc::UnboundedReceiver<TriggerMsg>,
    coordinator_tx: mpsc::Sender<CoordinatorMsg>,
    debouncer: Debouncer,
    active: bool,
    /// Last encoding seen while active (duplicate suppression)
    encoding: Option<String>,
}

impl ScanTrigger {
    pub fn new(
        rx: mpsc::UnboundedReceiver<TriggerMsg>,
        coordinator_tx: mpsc::Sender<CoordinatorMsg>,
        window: Duration,
    ) -> Self {
        Self {
            rx,
            coordinator_tx,
            debouncer: Debouncer::new(window),
            active: false,
            encoding: None,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        loop {
            let flow = tokio::select! {
                biased; // Lifecycle and events take priority over the timer

                msg = self.rx.recv() => match msg {
                    Some(msg) => self.handle(msg, Instant::now()),
                    None => Flow::Stop,
                },

                _ = tokio::time::sleep(self.debouncer.sleep_duration(Instant::now())),
                    if self.debouncer.is_pending() =>
                {
                    match self.debouncer.take_if_ready(Instant::now()) {
                        Some(coalesced) => {
                            crate::debug!("trigger"; "{} edit(s) settled", coalesced);
                            Flow::Fire("edit")
                        }
                        None => Flow::Continue,
                    }
                }
            };

            match flow {
                Flow::Continue => {}
                Flow::Fire(reason) => {
                    crate::debug!("trigger"; "rescan ({})", reason);
                    if self.coordinator_tx.send(CoordinatorMsg::Rescan).await.is_err() {
                        break; // Coordinator dropped
                    }
                }
                Flow::Stop => break,
            }
        }

        crate::debug!("trigger"; "stopped");
    }

    fn handle(&mut self, msg: TriggerMsg, now: Instant) -> Flow {
        match msg {
            TriggerMsg::Source(event) if self.active => self.on_source_event(event, now),
            TriggerMsg::Source(_) => Flow::Continue,
            TriggerMsg::Activate { encoding } => {
                self.active = true;
                self.encoding = Some(encoding);
                self.debouncer.discard();
                Flow::Fire("activate")
            }
            TriggerMsg::Deactivate => {
                self.active = false;
                self.encoding = None;
                self.debouncer.discard();
                Flow::Continue
            }
            TriggerMsg::Shutdown => Flow::Stop,
        }
    }

    fn on_source_event(&mut self, event: SourceEvent, now: Instant) -> Flow {
        match event {
            SourceEvent::TextChanged => {
                self.debouncer.add_edit(now);
                Flow::Continue
            }
            // Styling-only edits cannot change representability
            SourceEvent::AttributesChanged => Flow::Continue,
            SourceEvent::EncodingChanged(label) => {
                if self.encoding.as_deref() == Some(label.as_str()) {
                    return Flow::Continue;
                }
                self.encoding = Some(label);
                // The immediate scan reads the text after every pending edit
                self.debouncer.discard();
                Flow::Fire("encoding")
            }
        }
    }
}
