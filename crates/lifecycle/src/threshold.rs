use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default cleanup threshold in milliseconds (one minute).
pub const DEFAULT_CLEANUP_THRESHOLD: u64 = 60_000;

/// Shared cleanup threshold in milliseconds.
///
/// Clones refer to the same value, so the owner can keep one clone and update
/// it while a [`LifecycleManager`](crate::LifecycleManager) reads another.
#[derive(Clone, Debug)]
pub struct CleanupThreshold(Arc<AtomicU64>);

impl CleanupThreshold {
    /// Creates a new cell holding `threshold_ms`.
    #[must_use]
    pub fn new(threshold_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(threshold_ms)))
    }

    /// Current threshold.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Replaces the threshold. Takes effect from the next cleanup pass.
    pub fn set(&self, threshold_ms: u64) {
        self.0.store(threshold_ms, Ordering::SeqCst);
    }
}

impl Default for CleanupThreshold {
    fn default() -> Self {
        Self::new(DEFAULT_CLEANUP_THRESHOLD)
    }
}

impl From<Arc<AtomicU64>> for CleanupThreshold {
    fn from(cell: Arc<AtomicU64>) -> Self {
        Self(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_minute() {
        assert_eq!(CleanupThreshold::default().get(), 60_000);
    }

    #[test]
    fn test_clones_share_value() {
        let threshold = CleanupThreshold::new(1_000);
        let reader = threshold.clone();

        threshold.set(2_500);

        assert_eq!(reader.get(), 2_500);
    }

    #[test]
    fn test_wraps_external_cell() {
        let cell = Arc::new(AtomicU64::new(42));
        let threshold = CleanupThreshold::from(Arc::clone(&cell));

        cell.store(84, Ordering::SeqCst);

        assert_eq!(threshold.get(), 84);
    }
}
