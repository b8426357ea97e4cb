//! Recording player implementation for tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use async_trait::async_trait;
use cadence_player::{Player, PlayerError};
use parking_lot::Mutex;

/// How a mock player responds to a cleanup check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Behaviour {
    /// Return `Ok(())`.
    #[default]
    Succeed,

    /// Return an error.
    Fail,

    /// Panic.
    Panic,
}

/// Player that records every cleanup check it receives.
///
/// The threshold is recorded before the scripted behaviour is applied, so
/// failing and panicking checks are counted too.
#[derive(Debug, Default)]
pub struct MockPlayer {
    behaviour: Mutex<Behaviour>,
    thresholds: Mutex<Vec<u64>>,
}

impl MockPlayer {
    /// Creates a player whose checks succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a player with the given behaviour.
    #[must_use]
    pub fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour: Mutex::new(behaviour),
            thresholds: Mutex::default(),
        }
    }

    /// Changes how subsequent checks respond.
    pub fn set_behaviour(&self, behaviour: Behaviour) {
        *self.behaviour.lock() = behaviour;
    }

    /// Number of cleanup checks received.
    #[must_use]
    pub fn checks(&self) -> usize {
        self.thresholds.lock().len()
    }

    /// Every threshold received, in order.
    #[must_use]
    pub fn thresholds(&self) -> Vec<u64> {
        self.thresholds.lock().clone()
    }

    /// The most recent threshold received.
    #[must_use]
    pub fn last_threshold(&self) -> Option<u64> {
        self.thresholds.lock().last().copied()
    }
}

#[async_trait]
impl Player for MockPlayer {
    async fn check_cleanup(&self, threshold_ms: u64) -> Result<(), PlayerError> {
        self.thresholds.lock().push(threshold_ms);

        let behaviour = *self.behaviour.lock();
        match behaviour {
            Behaviour::Succeed => Ok(()),
            Behaviour::Fail => Err(Box::new(Error)),
            Behaviour::Panic => panic!("mock player panicked during cleanup check"),
        }
    }
}
