//! Abstract interface for running recurring background work.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod task;

pub use task::ScheduledTask;

use std::error::Error;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Marker trait for `Scheduler` errors
pub trait SchedulerError: Debug + Error + Send + Sync + 'static {}

/// Work that runs repeatedly until its handle is cancelled.
#[async_trait]
pub trait PeriodicTask
where
    Self: Send + Sync + 'static,
{
    /// Name of the task, used in logs.
    fn name(&self) -> &str;

    /// Execute a single run of the task.
    ///
    /// Implementations must not panic; a panic ends the recurring schedule.
    async fn run(&self);
}

/// Runs periodic tasks at a fixed rate.
pub trait Scheduler
where
    Self: Send + Sync + 'static,
{
    /// The error type for scheduling operations.
    type Error: SchedulerError;

    /// Schedules `task` to run once `initial_delay` has elapsed and then every
    /// `period` until the returned handle is cancelled.
    ///
    /// Cancelling the handle prevents any further run from starting. A run
    /// that has already started is left to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler no longer accepts work.
    fn schedule_at_fixed_rate(
        &self,
        task: Arc<dyn PeriodicTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<ScheduledTask, Self::Error>;
}
