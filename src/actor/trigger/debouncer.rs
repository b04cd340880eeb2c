use std::time::Duration;

use tokio::time::Instant;

pub(crate) const DEBOUNCE_MS: u64 = 300;

/// Pure debouncer: only handles timing and burst counting.
/// No channel access, no lifecycle state.
pub(super) struct Debouncer {
    window: Duration,
    /// Edits coalesced into the pending pulse
    pub(super) pending: usize,
    pub(super) last_edit: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            pending: 0,
            last_edit: None,
        }
    }

    /// Record an edit. Every edit restarts the quiet window.
    pub(super) fn add_edit(&mut self, now: Instant) {
        self.pending += 1;
        self.last_edit = Some(now);
    }

    #[inline]
    pub(super) fn is_pending(&self) -> bool {
        self.last_edit.is_some()
    }

    pub(super) fn is_ready(&self, now: Instant) -> bool {
        self.last_edit
            .is_some_and(|last| now.saturating_duration_since(last) >= self.window)
    }

    /// Take the burst if the quiet window has elapsed.
    /// Returns the number of coalesced edits.
    pub(super) fn take_if_ready(&mut self, now: Instant) -> Option<usize> {
        if !self.is_ready(now) {
            return None;
        }
        let coalesced = self.pending;
        self.discard();
        Some(coalesced)
    }

    /// Forget the pending burst.
    pub(super) fn discard(&mut self) {
        self.pending = 0;
        self.last_edit = None;
    }

    /// Precise sleep duration until the burst is ready.
    pub(super) fn sleep_duration(&self, now: Instant) -> Duration {
        let Some(last_edit) = self.last_edit else {
            return Duration::from_secs(86400);
        };

        self.window
            .saturating_sub(now.saturating_duration_since(last_edit))
            .max(Duration::from_millis(1))
    }
}
