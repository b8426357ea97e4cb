use thiserror::Error;

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing player lifecycles.
#[derive(Debug, Error)]
pub enum Error {
    /// The scheduler refused to accept the recurring cleanup task.
    #[error("failed to schedule the cleanup task: {0}")]
    Schedule(#[source] Box<dyn std::error::Error + Send + Sync>),
}
