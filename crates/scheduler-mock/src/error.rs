use cadence_scheduler::SchedulerError;
use thiserror::Error;

/// Returned when the mock scheduler has been told to reject work.
#[derive(Clone, Debug, Error)]
#[error("scheduler rejected the task")]
pub struct Error;

impl SchedulerError for Error {}
