//! Manually driven scheduler for deterministic tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use cadence_scheduler::{PeriodicTask, ScheduledTask, Scheduler};
use parking_lot::Mutex;

struct Entry {
    task: Arc<dyn PeriodicTask>,
    handle: ScheduledTask,
    initial_delay: Duration,
    period: Duration,
}

#[derive(Default)]
struct Inner {
    entries: Mutex<Vec<Entry>>,
    accepted: AtomicUsize,
    rejecting: AtomicBool,
    reject_next: AtomicUsize,
}

/// Scheduler whose tasks only run when the test calls `fire`.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Inner>,
}

impl ManualScheduler {
    /// Creates a new scheduler with no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every live task once, as if one period had elapsed.
    ///
    /// Returns the number of tasks that ran.
    pub async fn fire(&self) -> usize {
        let live: Vec<(Arc<dyn PeriodicTask>, ScheduledTask)> = {
            let mut entries = self.inner.entries.lock();
            entries.retain(|entry| !entry.handle.is_cancelled());
            entries
                .iter()
                .map(|entry| (Arc::clone(&entry.task), entry.handle.clone()))
                .collect()
        };

        let mut runs = 0;
        for (task, handle) in live {
            if handle.is_cancelled() {
                continue;
            }

            task.run().await;
            runs += 1;
        }

        runs
    }

    /// Fires `count` periods in a row, returning the total number of runs.
    pub async fn fire_times(&self, count: usize) -> usize {
        let mut runs = 0;
        for _ in 0..count {
            runs += self.fire().await;
        }

        runs
    }

    /// Number of scheduled tasks that have not been cancelled.
    #[must_use]
    pub fn live_tasks(&self) -> usize {
        self.inner
            .entries
            .lock()
            .iter()
            .filter(|entry| !entry.handle.is_cancelled())
            .count()
    }

    /// Number of tasks ever accepted, cancelled or not.
    #[must_use]
    pub fn accepted_tasks(&self) -> usize {
        self.inner.accepted.load(Ordering::SeqCst)
    }

    /// Initial delay and period of every live task.
    #[must_use]
    pub fn timings(&self) -> Vec<(Duration, Duration)> {
        self.inner
            .entries
            .lock()
            .iter()
            .filter(|entry| !entry.handle.is_cancelled())
            .map(|entry| (entry.initial_delay, entry.period))
            .collect()
    }

    /// Rejects all scheduling requests while `rejecting` is set.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.inner.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Rejects the next scheduling request only.
    pub fn reject_next(&self) {
        self.inner.reject_next.fetch_add(1, Ordering::SeqCst);
    }

    fn should_reject(&self) -> bool {
        if self.inner.rejecting.load(Ordering::SeqCst) {
            return true;
        }

        self.inner
            .reject_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |pending| {
                pending.checked_sub(1)
            })
            .is_ok()
    }
}

impl Scheduler for ManualScheduler {
    type Error = Error;

    fn schedule_at_fixed_rate(
        &self,
        task: Arc<dyn PeriodicTask>,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<ScheduledTask, Self::Error> {
        if self.should_reject() {
            return Err(Error);
        }

        let handle = ScheduledTask::new(task.name());

        self.inner.entries.lock().push(Entry {
            task,
            handle: handle.clone(),
            initial_delay,
            period,
        });
        self.inner.accepted.fetch_add(1, Ordering::SeqCst);

        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use async_trait::async_trait;

    #[derive(Default)]
    struct Counter {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl PeriodicTask for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        async fn run(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn schedule(
        scheduler: &ManualScheduler,
        counter: &Arc<Counter>,
    ) -> Result<ScheduledTask, Error> {
        scheduler.schedule_at_fixed_rate(
            counter.clone(),
            Duration::from_secs(1),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_fire_runs_live_tasks() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(Counter::default());
        let handle = schedule(&scheduler, &counter).unwrap();

        assert_eq!(scheduler.fire_times(3).await, 3);
        assert_eq!(counter.runs.load(Ordering::SeqCst), 3);
        assert_eq!(
            scheduler.timings(),
            vec![(Duration::from_secs(1), Duration::from_secs(2))]
        );

        handle.cancel();

        assert_eq!(scheduler.fire().await, 0);
        assert_eq!(scheduler.live_tasks(), 0);
        assert_eq!(scheduler.accepted_tasks(), 1);
    }

    #[tokio::test]
    async fn test_reject_next_only_rejects_once() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(Counter::default());

        scheduler.reject_next();

        assert_matches!(schedule(&scheduler, &counter), Err(Error));
        assert!(schedule(&scheduler, &counter).is_ok());
        assert_eq!(scheduler.live_tasks(), 1);
    }

    #[tokio::test]
    async fn test_rejecting_until_cleared() {
        let scheduler = ManualScheduler::new();
        let counter = Arc::new(Counter::default());

        scheduler.set_rejecting(true);
        assert_matches!(schedule(&scheduler, &counter), Err(Error));
        assert_matches!(schedule(&scheduler, &counter), Err(Error));

        scheduler.set_rejecting(false);
        assert!(schedule(&scheduler, &counter).is_ok());
        assert_eq!(scheduler.accepted_tasks(), 1);
    }
}
