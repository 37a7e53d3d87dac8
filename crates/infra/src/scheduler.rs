//! Periodic sync scheduler
//!
//! Drives the sync orchestrator on a fixed interval with lifecycle
//! management.

use std::sync::Arc;
use std::time::Duration;

use leadforge_core::SyncService;
use leadforge_domain::{LeadForgeError, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the sync scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between ticks
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Periodic scheduler that keeps the token fresh and drains the backlog.
pub struct SyncScheduler {
    service: Arc<SyncService>,
    config: SchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl SyncScheduler {
    pub fn new(service: Arc<SyncService>, config: SchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that ticks periodically.
    ///
    /// # Errors
    /// Returns an error if the scheduler is already running.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running().await {
            return Err(LeadForgeError::Internal("scheduler already running".into()));
        }

        info!(interval_secs = self.config.interval.as_secs(), "Starting sync scheduler");

        // Create a new cancellation token (supports restart after stop)
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::tick_loop(service, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background task and awaits completion.
    ///
    /// # Errors
    /// Returns an error if the scheduler is not running.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        if !self.is_running().await {
            return Err(LeadForgeError::Internal("scheduler not running".into()));
        }

        info!("Stopping sync scheduler");

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            match tokio::time::timeout(Duration::from_secs(5), handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(error = %e, "Scheduler task panicked");
                    return Err(LeadForgeError::Internal("scheduler task panicked".into()));
                }
                Err(_) => {
                    warn!("Scheduler task did not complete within timeout");
                    return Err(LeadForgeError::Internal("scheduler task timeout".into()));
                }
            }
        }

        info!("Sync scheduler stopped");

        Ok(())
    }

    /// Check if the scheduler has an active task handle.
    pub async fn is_running(&self) -> bool {
        self.task_handle.lock().await.is_some()
    }

    /// Background tick loop. A failed tick is logged and the loop keeps
    /// going; the next interval retries everything that stayed pending.
    async fn tick_loop(service: Arc<SyncService>, interval: Duration, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Tick loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    match service.tick().await {
                        Ok(report) => debug!(
                            token_refreshed = report.token_refreshed,
                            attempted = report.backlog.attempted,
                            delivered = report.backlog.delivered,
                            failed = report.backlog.failed,
                            "Scheduled sync tick completed"
                        ),
                        Err(e) => warn!(error = %e, "Scheduled sync tick failed"),
                    }
                }
            }
        }
    }
}

/// Ensure the background task is cancelled when dropped
impl Drop for SyncScheduler {
    fn drop(&mut self) {
        // Best-effort cleanup; can't await the handle here
        if !self.cancellation_token.is_cancelled() {
            warn!("SyncScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
