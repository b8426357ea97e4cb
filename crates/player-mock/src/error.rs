use thiserror::Error;

/// Returned by a mock player scripted to fail its cleanup check.
#[derive(Clone, Debug, Error)]
#[error("mock cleanup check failed")]
pub struct Error;
