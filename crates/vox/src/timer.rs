use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::error::VoxError;

/// A repeating timer on the tokio runtime.
///
/// The first tick fires one period after `start`. Each tick's callback runs
/// while holding the timer's gate, and checks the cancellation flag first.
/// `cancel` takes the same gate, so once it returns no callback is running
/// and none will run again.
///
/// The callback must not cancel its own timer; that would deadlock on the
/// gate.
pub struct RepeatingTimer {
    cancelled: Arc<Mutex<bool>>,
    task: AbortHandle,
}

impl RepeatingTimer {
    /// Arms the timer on the current tokio runtime.
    ///
    /// Fails with [`VoxError::AllocationFailure`] outside a runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Result<Self, VoxError>
    where
        F: FnMut() + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|e| {
            VoxError::AllocationFailure(format!("no runtime to arm the timer: {}", e))
        })?;

        let cancelled = Arc::new(Mutex::new(false));
        let gate = cancelled.clone();

        let task = handle.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            // Re-arm relative to the last firing, never burst to catch up.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                {
                    let cancelled = gate.lock();
                    if *cancelled {
                        break;
                    }
                    on_tick();
                }
            }
        });

        Ok(Self {
            cancelled,
            task: task.abort_handle(),
        })
    }

    /// Stops the timer. Blocks until an in-flight callback has finished.
    pub fn cancel(&self) {
        *self.cancelled.lock() = true;
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock()
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
