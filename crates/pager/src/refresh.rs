//! Periodic reload of a list controller.

use std::sync::Arc;
use std::time::Duration;

use chatdash_core::ListSource;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::controller::PaginatedFilteredListController;
use crate::renderer::PageRenderer;

/// Reloads the current page of a controller on a fixed period.
///
/// The first reload happens one full period after `spawn`. Dropping the
/// handle stops the loop and aborts a reload that is still running.
#[derive(Debug)]
pub struct AutoRefresh {
    task: JoinHandle<()>,
}

impl AutoRefresh {
    /// Must be called from within a tokio runtime.
    #[must_use = "dropping the handle stops the refresh loop"]
    pub fn spawn<S, R>(controller: Arc<PaginatedFilteredListController<S, R>>, period: Duration) -> Self
    where
        S: ListSource + 'static,
        R: PageRenderer<S::Item> + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the caller has just loaded.
            interval.tick().await;
            loop {
                interval.tick().await;
                match controller.load().await {
                    Ok(page) => {
                        tracing::debug!(total = page.total_count, "periodic refresh done");
                    },
                    Err(e) if e.is_stale() => {
                        tracing::debug!(error = %e, "periodic refresh overtaken");
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "periodic refresh failed");
                    },
                }
            }
        });
        Self { task }
    }

    /// Stops the loop and aborts a reload that is still running.
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.task.abort();
    }
}
