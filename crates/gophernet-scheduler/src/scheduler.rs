//! Periodic jobs with cooperative cancellation and a join barrier

use crate::{SchedulerConfig, SchedulerError};
use gophernet_service::BurrowService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Action performed by a job on every tick
type JobAction = fn(&dyn BurrowService);

/// Runs the burrow updater, state saver and report saver
///
/// Each job lives in its own task and fires first one full interval after
/// it starts. All jobs watch a shared cancellation flag; [`Scheduler::shutdown`]
/// raises it and waits for every job to return.
///
/// # Examples
///
/// ```no_run
/// use gophernet_scheduler::{Scheduler, SchedulerConfig};
/// use gophernet_service::{BurrowService, GopherNetService};
/// use gophernet_store::MemoryStore;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service: Arc<dyn BurrowService> = Arc::new(GopherNetService::new(
///     MemoryStore::new("data/state.json", "data/report.txt"),
/// ));
///
/// let mut scheduler = Scheduler::new(service);
/// scheduler.start_all(&SchedulerConfig::default())?;
///
/// // ... serve requests ...
///
/// scheduler.shutdown(Duration::from_millis(500)).await?;
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    service: Arc<dyn BurrowService>,
    cancel_tx: watch::Sender<bool>,
    jobs: JoinSet<()>,
}

impl Scheduler {
    /// Create a scheduler with no jobs running
    pub fn new(service: Arc<dyn BurrowService>) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self {
            service,
            cancel_tx,
            jobs: JoinSet::new(),
        }
    }

    /// Start all three jobs with the configured intervals
    pub fn start_all(&mut self, config: &SchedulerConfig) -> Result<(), SchedulerError> {
        self.start_burrow_updater(config.tick_interval())?;
        self.start_state_saver(config.save_interval())?;
        self.start_report_saver(config.report_interval())?;
        Ok(())
    }

    /// Tick every burrow once per `every`
    pub fn start_burrow_updater(&mut self, every: Duration) -> Result<(), SchedulerError> {
        self.spawn_job("burrow-updater", every, update_burrows)
    }

    /// Snapshot the catalog once per `every`
    pub fn start_state_saver(&mut self, every: Duration) -> Result<(), SchedulerError> {
        self.spawn_job("state-saver", every, save_state)
    }

    /// Write the report once per `every`
    pub fn start_report_saver(&mut self, every: Duration) -> Result<(), SchedulerError> {
        self.spawn_job("report-saver", every, save_report)
    }

    /// Signal every job to stop. Calling it more than once has no effect.
    pub fn cancel(&self) {
        if !self.cancel_tx.send_replace(true) {
            tracing::info!("Cancelling scheduled jobs");
        }
    }

    /// Whether [`Scheduler::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Number of jobs that have not yet been joined
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Cancel all jobs and wait for them to return
    ///
    /// Jobs still running after `timeout` are aborted and
    /// [`SchedulerError::ShutdownTimeout`] is returned.
    pub async fn shutdown(mut self, timeout: Duration) -> Result<(), SchedulerError> {
        self.cancel();

        let mut panicked = 0;
        let jobs = &mut self.jobs;
        let joined = tokio::time::timeout(timeout, async {
            while let Some(result) = jobs.join_next().await {
                if let Err(e) = result {
                    tracing::error!(error = %e, "scheduled job ended abnormally");
                    if e.is_panic() {
                        panicked += 1;
                    }
                }
            }
        })
        .await;

        if joined.is_err() {
            tracing::warn!(remaining = self.jobs.len(), ?timeout, "Shutdown timeout reached, aborting jobs");
            self.jobs.abort_all();
            return Err(SchedulerError::ShutdownTimeout(timeout));
        }

        if panicked > 0 {
            return Err(SchedulerError::JobPanicked(panicked));
        }

        tracing::debug!("All scheduled jobs stopped");
        Ok(())
    }

    fn spawn_job(
        &mut self,
        job: &'static str,
        every: Duration,
        action: JobAction,
    ) -> Result<(), SchedulerError> {
        if every.is_zero() {
            return Err(SchedulerError::ZeroInterval { job });
        }

        let service = Arc::clone(&self.service);
        let mut cancel_rx = self.cancel_tx.subscribe();

        self.jobs.spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(job, interval = ?every, "Scheduled job started");

            loop {
                if *cancel_rx.borrow_and_update() {
                    break;
                }

                tokio::select! {
                    biased;

                    changed = cancel_rx.changed() => {
                        // Sender gone means the scheduler itself was dropped
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let service = Arc::clone(&service);
                        // Store operations block on the catalog lock and on file I/O
                        let outcome = tokio::task::spawn_blocking(move || action(service.as_ref())).await;
                        if let Err(e) = outcome {
                            tracing::error!(job, error = %e, "Scheduled action panicked");
                        }
                    }
                }
            }

            tracing::debug!(job, "Scheduled job stopped");
        });

        Ok(())
    }
}

fn update_burrows(service: &dyn BurrowService) {
    tracing::debug!("updating burrows");
    service.update_burrows();
}

fn save_state(service: &dyn BurrowService) {
    tracing::debug!("saving state");
    if let Err(e) = service.save_state() {
        tracing::error!(error = %e, "Error saving state");
    }
}

fn save_report(service: &dyn BurrowService) {
    tracing::debug!("saving report");
    if let Err(e) = service.save_report() {
        tracing::error!(error = %e, "Error generating report");
    }
}
