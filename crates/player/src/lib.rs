//! Abstract interface for players whose lifecycle is tracked by a coordinator.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod event;
mod reference;

pub use event::{PlayerEvent, TrackEndReason};
pub use reference::PlayerRef;

use async_trait::async_trait;

/// Error returned by a player's cleanup check.
pub type PlayerError = Box<dyn std::error::Error + Send + Sync>;

/// A unit of ongoing playback whose lifecycle is tracked externally.
#[async_trait]
pub trait Player
where
    Self: Send + Sync + 'static,
{
    /// Release the player's resources if it has gone unattended for at least
    /// `threshold_ms` milliseconds.
    ///
    /// What "unattended" means is up to the implementation.
    async fn check_cleanup(&self, threshold_ms: u64) -> Result<(), PlayerError>;
}

/// Reacts to player lifecycle notifications.
pub trait MembershipObserver
where
    Self: Send + Sync,
{
    /// Apply a single player event.
    fn on_membership_change(&self, event: &PlayerEvent);
}
