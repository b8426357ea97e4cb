use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// Handle to a scheduled recurring task.
///
/// Clones share the same cancellation state.
#[derive(Clone, Debug)]
pub struct ScheduledTask {
    name: Arc<str>,
    token: CancellationToken,
}

impl ScheduledTask {
    /// Creates a handle with its own cancellation state.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            token: CancellationToken::new(),
        }
    }

    /// Creates a handle that is also cancelled when `parent` is cancelled.
    #[must_use]
    pub fn with_parent(name: impl Into<Arc<str>>, parent: &CancellationToken) -> Self {
        Self {
            name: name.into(),
            token: parent.child_token(),
        }
    }

    /// Name of the scheduled task.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cancels all future runs. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the task has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the task has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let task = ScheduledTask::new("cleanup");
        let clone = task.clone();

        assert!(!clone.is_cancelled());

        task.cancel();
        task.cancel();

        assert!(clone.is_cancelled());
        assert_eq!(clone.name(), "cleanup");
    }

    #[test]
    fn test_parent_cancels_child() {
        let parent = CancellationToken::new();
        let task = ScheduledTask::with_parent("cleanup", &parent);

        parent.cancel();

        assert!(task.is_cancelled());
    }

    #[test]
    fn test_child_does_not_cancel_parent() {
        let parent = CancellationToken::new();
        let task = ScheduledTask::with_parent("cleanup", &parent);

        task.cancel();

        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves() {
        let task = ScheduledTask::new("cleanup");
        let waiter = task.clone();

        let handle = tokio::spawn(async move { waiter.cancelled().await });
        task.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("cancellation not observed")
            .expect("waiter panicked");
    }
}
