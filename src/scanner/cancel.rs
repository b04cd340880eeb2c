use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::ScanError;

/// Cooperative cancellation shared between the coordinator and one scan.
///
/// Raising the flag only asks the scan to stop; whether its result may be
/// committed is decided by the generation check, not by this flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn check(&self) -> Result<(), ScanError> {
        if self.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }
}
