//! Per-request cancellation and deadline handling.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use common::{AppError, AppResult};

/// Cancellation signal threaded from the HTTP boundary down to the
/// repository.
///
/// Cloning shares the cancellation flag, so any clone can cancel the request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    /// Context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancelled: Arc::default(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once cancelled or past the deadline
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Time left before the deadline, `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fail with `Cancelled` if the request should not start more work.
    pub fn ensure_active(&self) -> AppResult<()> {
        if self.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    /// Run `fut` unless already cancelled, giving up at the deadline.
    pub async fn bound<F, T>(&self, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        self.ensure_active()?;
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| AppError::Cancelled)?,
            None => fut.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_fresh_context_is_active() {
        let ctx = RequestContext::new();
        assert_ok!(ctx.ensure_active());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let ctx = RequestContext::new();
        let handle = ctx.clone();
        handle.cancel();
        assert_err!(ctx.ensure_active());
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_bound_skips_future_when_cancelled() {
        let ctx = RequestContext::new();
        ctx.cancel();

        let mut ran = false;
        let result = ctx
            .bound(async {
                ran = true;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
        assert!(!ran);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bound_times_out_at_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(50));

        let result: AppResult<()> = ctx
            .bound(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_counts_as_cancelled() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(20)).await;
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }
}
