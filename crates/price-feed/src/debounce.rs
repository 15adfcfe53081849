//! Debounced on-demand refetch
//!
//! At most one refetch is pending at a time. Every trigger cancels the
//! pending one and arms a fresh timer.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::aggregator::Refresher;

pub struct DebouncedRefresh {
    window: Duration,
    refresher: Refresher,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl DebouncedRefresh {
    pub fn new(window: Duration, refresher: Refresher) -> Self {
        Self {
            window,
            refresher,
            pending: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm the refetch, replacing any pending one.
    ///
    /// The timer runs on the current Tokio runtime. Outside a runtime
    /// nothing is armed and `false` is returned.
    pub fn trigger(&self) -> bool {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Refetch not scheduled: {}", e);
                return false;
            }
        };

        let mut slot = self.pending.lock();
        if let Some(handle) = slot.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending refetch");
            }
            handle.abort();
        }

        let refresher = self.refresher.clone();
        let window = self.window;
        *slot = Some(runtime.spawn(async move {
            tokio::time::sleep(window).await;
            // Errors are already recorded in the book
            let _ = refresher.refresh().await;
        }));
        true
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for DebouncedRefresh {
    fn drop(&mut self) {
        self.cancel();
    }
}
