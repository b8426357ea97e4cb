//! Fixed-rate scheduler backed by the tokio runtime.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::sync::Arc;
use std::time::Duration;

use cadence_scheduler::{PeriodicTask, ScheduledTask, Scheduler};
use tokio::runtime::Handle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, trace, warn};

/// Options for creating a new `TokioScheduler`.
#[derive(Clone, Debug)]
pub struct TokioSchedulerOptions {
    /// How long `shutdown` waits for in-flight runs to finish.
    pub shutdown_timeout: Duration,
}

impl Default for TokioSchedulerOptions {
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

/// Runs periodic tasks as tokio tasks.
///
/// Clones share the same set of tasks and the same shutdown state.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    shutdown_timeout: Duration,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl TokioScheduler {
    /// Creates a new scheduler.
    #[must_use]
    pub fn new(TokioSchedulerOptions { shutdown_timeout }: TokioSchedulerOptions) -> Self {
        Self {
            shutdown_timeout,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Cancels every scheduled task and stops accepting new ones.
    ///
    /// Waits up to the configured timeout for runs that are already in
    /// progress.
    pub async fn shutdown(&self) {
        info!("shutting down scheduler");

        self.shutdown_token.cancel();
        self.task_tracker.close();

        if timeout(self.shutdown_timeout, self.task_tracker.wait())
            .await
            .is_err()
        {
            warn!(
                remaining = self.task_tracker.len(),
                "scheduler shutdown timed out waiting for running tasks"
            );
        }
    }

    /// Whether `shutdown` has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Number of recurring tasks that have not yet exited.
    #[must_use]
    pub fn running_tasks(&self) -> usize {
        self.task_tracker.len()
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new(TokioSchedulerOptions::default())
    }
}

impl Scheduler for TokioScheduler {
    type Error = Error;

    fn schedule_at_fixed_rate(
        &self,
        task: Arc<dyn PeriodicTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<ScheduledTask> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ShutDown);
        }

        if period.is_zero() {
            return Err(Error::ZeroPeriod);
        }

        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let handle = ScheduledTask::with_parent(task.name(), &self.shutdown_token);

        debug!(task = task.name(), ?initial_delay, ?period, "scheduling recurring task");

        self.task_tracker.spawn_on(
            run_at_fixed_rate(task, handle.clone(), initial_delay, period),
            &runtime,
        );

        Ok(handle)
    }
}

async fn run_at_fixed_rate(
    task: Arc<dyn PeriodicTask>,
    handle: ScheduledTask,
    initial_delay: Duration,
    period: Duration,
) {
    let mut ticker = interval_at(Instant::now() + initial_delay, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            () = handle.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // Cancellation may land between the tick firing and this point.
        if handle.is_cancelled() {
            break;
        }

        trace!(task = handle.name(), "running scheduled task");
        task.run().await;
    }

    debug!(task = handle.name(), "recurring task stopped");
}
