//! Generation bookkeeping for the scan state machine.
//!
//! ```text
//!            begin                 complete(g) current
//!   Idle ──────────▶ Scanning(g) ─────────────────────▶ Idle
//!                     │   ▲  begin: g superseded
//!                     │   └────── Scanning(g+1)
//!                     │ retire
//!                     ▼           complete(g) late
//!               Superseded(g) ────────────────────────▶ Idle
//! ```

use crate::core::ScanState;

/// How a finished generation is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Verdict {
    /// The generation is the one being waited for.
    Current,
    /// A newer generation started, or the coordinator was deactivated.
    Superseded,
}

#[derive(Debug, Default)]
pub(super) struct GenerationTracker {
    /// Highest generation ever issued.
    latest: u64,
    /// Highest generation ever accepted.
    accepted: Option<u64>,
    state: ScanState,
}

impl GenerationTracker {
    pub(super) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(super) fn state(&self) -> ScanState {
        self.state
    }

    #[inline]
    pub(super) fn accepted(&self) -> Option<u64> {
        self.accepted
    }

    /// Start a new generation. Returns it and the generation it superseded.
    pub(super) fn begin(&mut self) -> (u64, Option<u64>) {
        self.latest += 1;
        let superseded = match self.state {
            ScanState::Scanning(g) => Some(g),
            ScanState::Idle | ScanState::Superseded(_) => None,
        };
        self.state = ScanState::Scanning(self.latest);
        (self.latest, superseded)
    }

    /// Give up on the running generation without starting another.
    pub(super) fn retire(&mut self) -> Option<u64> {
        match self.state {
            ScanState::Scanning(g) => {
                self.state = ScanState::Superseded(g);
                Some(g)
            }
            _ => None,
        }
    }

    /// Judge a finished generation. Late superseded outcomes release the
    /// `Superseded` state; the current one stays `Scanning` until
    /// [`accept`](Self::accept).
    pub(super) fn judge(&mut self, generation: u64) -> Verdict {
        match self.state {
            ScanState::Scanning(g) if g == generation => Verdict::Current,
            ScanState::Superseded(g) if g == generation => {
                self.state = ScanState::Idle;
                Verdict::Superseded
            }
            _ => Verdict::Superseded,
        }
    }

    /// Commit the current generation: `Scanning(g)` → `Idle`.
    ///
    /// Returns `false` (and changes nothing) for any other generation.
    pub(super) fn accept(&mut self, generation: u64) -> bool {
        if self.state != ScanState::Scanning(generation) {
            return false;
        }
        debug_assert!(self.accepted.is_none_or(|accepted| accepted < generation));
        self.state = ScanState::Idle;
        self.accepted = Some(generation);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_from_idle() {
        let mut tracker = GenerationTracker::new();
        assert_eq!(tracker.begin(), (1, None));
        assert_eq!(tracker.state(), ScanState::Scanning(1));
    }

    #[test]
    fn test_newer_generation_supersedes() {
        let mut tracker = GenerationTracker::new();
        tracker.begin();
        assert_eq!(tracker.begin(), (2, Some(1)));

        assert_eq!(tracker.judge(2), Verdict::Current);
        assert!(tracker.accept(2));
        assert_eq!(tracker.state(), ScanState::Idle);

        // generation 1 finishes after 2 was committed
        assert_eq!(tracker.judge(1), Verdict::Superseded);
        assert!(!tracker.accept(1));
        assert_eq!(tracker.accepted(), Some(2));
    }

    #[test]
    fn test_late_result_while_newer_runs() {
        let mut tracker = GenerationTracker::new();
        tracker.begin();
        tracker.begin();

        assert_eq!(tracker.judge(1), Verdict::Superseded);
        assert_eq!(tracker.state(), ScanState::Scanning(2));
    }

    #[test]
    fn test_retire_then_late_completion() {
        let mut tracker = GenerationTracker::new();
        tracker.begin();
        assert_eq!(tracker.retire(), Some(1));
        assert_eq!(tracker.state(), ScanState::Superseded(1));

        assert_eq!(tracker.judge(1), Verdict::Superseded);
        assert_eq!(tracker.state(), ScanState::Idle);
        assert_eq!(tracker.accepted(), None);
    }

    #[test]
    fn test_generations_keep_growing_across_retire() {
        let mut tracker = GenerationTracker::new();
        tracker.begin();
        tracker.retire();
        assert_eq!(tracker.begin(), (2, None));

        // the retired generation must not disturb the new one
        assert_eq!(tracker.judge(1), Verdict::Superseded);
        assert_eq!(tracker.state(), ScanState::Scanning(2));
    }

    #[test]
    fn test_retire_when_idle() {
        let mut tracker = GenerationTracker::new();
        assert_eq!(tracker.retire(), None);
        assert_eq!(tracker.state(), ScanState::Idle);
    }
}
