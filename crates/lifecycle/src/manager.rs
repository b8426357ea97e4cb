use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence_player::{MembershipObserver, PlayerEvent, PlayerRef};
use cadence_scheduler::{PeriodicTask, ScheduledTask, Scheduler};
use dashmap::DashSet;
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::{CleanupThreshold, Error, Result};

/// Interval between cleanup passes. Also used as the initial delay.
pub const CHECK_INTERVAL: Duration = Duration::from_millis(10_000);

const TASK_NAME: &str = "player-cleanup";

/// Membership state shared between the manager, event listeners and the
/// scheduled task.
struct ActivePlayers {
    players: DashSet<PlayerRef>,
    threshold: CleanupThreshold,
}

impl ActivePlayers {
    #[instrument(skip(self), fields(players = self.players.len()))]
    async fn check_all(&self) {
        let threshold_ms = self.threshold.get();

        // Never hold a shard lock across a check: players may end their own
        // track from inside `check_cleanup`.
        let snapshot: Vec<PlayerRef> = self
            .players
            .iter()
            .map(|player| player.key().clone())
            .collect();

        trace!(threshold_ms, "running player cleanup checks");

        for player in snapshot {
            if !self.players.contains(&player) {
                continue;
            }

            match AssertUnwindSafe(player.check_cleanup(threshold_ms))
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(?player, error = %e, "player cleanup check failed");
                }
                Err(panic) => {
                    error!(
                        ?player,
                        panic = panic_message(&*panic),
                        "player cleanup check panicked"
                    );
                }
            }
        }
    }
}

impl MembershipObserver for ActivePlayers {
    fn on_membership_change(&self, event: &PlayerEvent) {
        match event {
            PlayerEvent::TrackStart { player } => {
                if self.players.insert(player.clone()) {
                    debug!(?player, "player became active");
                }
            }
            PlayerEvent::TrackEnd { player, reason } => {
                if self.players.remove(player).is_some() {
                    debug!(?player, %reason, "player became inactive");
                }
            }
            PlayerEvent::Other { .. } => {}
        }
    }
}

#[async_trait]
impl PeriodicTask for ActivePlayers {
    fn name(&self) -> &str {
        TASK_NAME
    }

    async fn run(&self) {
        self.check_all().await;
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Triggers cleanup checks on all active players at a fixed interval.
///
/// Players enter the active set on [`PlayerEvent::TrackStart`] and leave it on
/// [`PlayerEvent::TrackEnd`]. While running, every active player receives a
/// `check_cleanup` call with the current [`CleanupThreshold`] once per
/// [`CHECK_INTERVAL`].
///
/// The manager can be started and stopped any number of times. Dropping it
/// cancels the scheduled task.
pub struct LifecycleManager<S>
where
    S: Scheduler,
{
    active: Arc<ActivePlayers>,
    scheduler: S,
    task: Mutex<Option<ScheduledTask>>,
}

impl<S> LifecycleManager<S>
where
    S: Scheduler,
{
    /// Creates a stopped manager with no active players.
    ///
    /// # Arguments
    /// * `scheduler`: Runs the recurring cleanup pass.
    /// * `threshold`: Threshold passed to every cleanup check. The manager
    ///   only reads it.
    #[must_use]
    pub fn new(scheduler: S, threshold: CleanupThreshold) -> Self {
        Self {
            active: Arc::new(ActivePlayers {
                players: DashSet::new(),
                threshold,
            }),
            scheduler,
            task: Mutex::new(None),
        }
    }

    /// Schedules the recurring cleanup pass.
    ///
    /// Calling this while already running leaves the existing schedule in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schedule`] if the scheduler rejects the task. The
    /// manager stays stopped in that case.
    pub fn initialise(&self) -> Result<()> {
        let candidate = self
            .scheduler
            .schedule_at_fixed_rate(self.active.clone(), CHECK_INTERVAL, CHECK_INTERVAL)
            .map_err(|e| Error::Schedule(Box::new(e)))?;

        let mut task = self.task.lock();
        if task.is_some() {
            drop(task);
            candidate.cancel();
            debug!("player cleanup already scheduled");
            return Ok(());
        }

        *task = Some(candidate);
        info!(interval = ?CHECK_INTERVAL, "scheduled player cleanup");

        Ok(())
    }

    /// Cancels the recurring cleanup pass.
    ///
    /// No pass starts after this returns; one that is already running may
    /// finish. Does nothing if the manager is not running.
    pub fn shutdown(&self) {
        let task = self.task.lock().take();

        match task {
            Some(task) => {
                task.cancel();
                info!("stopped player cleanup");
            }
            None => debug!("player cleanup not running"),
        }
    }

    /// Whether a cleanup pass is currently scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Applies events from `events` in the order they were sent.
    ///
    /// The returned task finishes once every sender has been dropped.
    pub fn listen(&self, events: flume::Receiver<PlayerEvent>) -> JoinHandle<()> {
        let active = Arc::clone(&self.active);

        tokio::spawn(async move {
            while let Ok(event) = events.recv_async().await {
                trace!(kind = event.kind(), "applying player event");
                active.on_membership_change(&event);
            }

            debug!("player event channel closed");
        })
    }

    /// The threshold cell read by every cleanup pass.
    #[must_use]
    pub fn threshold(&self) -> &CleanupThreshold {
        &self.active.threshold
    }

    /// Whether `player` is in the active set.
    #[must_use]
    pub fn is_active(&self, player: &PlayerRef) -> bool {
        self.active.players.contains(player)
    }

    /// Number of active players.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.players.len()
    }

    /// Snapshot of the active players, in no particular order.
    #[must_use]
    pub fn active_players(&self) -> Vec<PlayerRef> {
        self.active
            .players
            .iter()
            .map(|player| player.key().clone())
            .collect()
    }
}

impl<S> MembershipObserver for LifecycleManager<S>
where
    S: Scheduler,
{
    fn on_membership_change(&self, event: &PlayerEvent) {
        self.active.on_membership_change(event);
    }
}

impl<S> Drop for LifecycleManager<S>
where
    S: Scheduler,
{
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.cancel();
        }
    }
}
