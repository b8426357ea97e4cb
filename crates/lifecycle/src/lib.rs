//! Periodic cleanup coordination for active players.
//!
//! [`LifecycleManager`] tracks which players are currently playing, driven by
//! their start and end events, and asks each of them to run a cleanup check
//! every [`CHECK_INTERVAL`]. The threshold handed to those checks lives in a
//! [`CleanupThreshold`] cell that the owner may update at any time.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod manager;
mod threshold;

pub use error::{Error, Result};
pub use manager::{CHECK_INTERVAL, LifecycleManager};
pub use threshold::{CleanupThreshold, DEFAULT_CLEANUP_THRESHOLD};
