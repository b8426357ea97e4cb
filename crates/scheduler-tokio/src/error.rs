use cadence_scheduler::SchedulerError;
use thiserror::Error;

/// Result type for tokio scheduler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scheduling work on the tokio runtime.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Scheduling was attempted outside of a tokio runtime.
    #[error("no tokio runtime is available to run the task")]
    NoRuntime,

    /// The scheduler has been shut down and accepts no new work.
    #[error("the scheduler has been shut down")]
    ShutDown,

    /// A recurring task was given a zero period.
    #[error("the period of a recurring task must be non-zero")]
    ZeroPeriod,
}

impl SchedulerError for Error {}
