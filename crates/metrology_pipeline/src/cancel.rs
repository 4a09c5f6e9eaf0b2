//! Cooperative cancellation of a pass.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metrology_foundation::{Error, Result};

/// A shared flag a host sets to abandon a running pass.
///
/// Clones observe the same flag. The pipeline checks it between stages and
/// between validation rounds; a cancelled pass publishes nothing.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with `Cancelled` if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` naming `stage`.
    pub fn check(&self, stage: &'static str) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::cancelled(stage))
        } else {
            Ok(())
        }
    }
}
