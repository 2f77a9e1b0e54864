//! Global in-flight request counter

use crate::chain::{Interceptor, Next};
use crate::error::HttpError;
use crate::request::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

/// Counts requests in flight and publishes whether any are running
#[derive(Debug)]
pub struct LoadingTracker {
    in_flight: Mutex<usize>,
    busy: watch::Sender<bool>,
}

impl LoadingTracker {
    /// Idle tracker
    #[must_use]
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            in_flight: Mutex::new(0),
            busy,
        }
    }

    /// Mark one request as started; it ends when the guard drops
    #[must_use]
    pub fn begin(self: &Arc<Self>) -> LoadingGuard {
        let mut count = self.in_flight.lock();
        *count += 1;
        if *count == 1 {
            self.busy.send_replace(true);
        }
        LoadingGuard {
            tracker: Arc::clone(self),
        }
    }

    fn end(&self) {
        let mut count = self.in_flight.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.busy.send_replace(false);
        }
    }

    /// Requests currently in flight
    #[must_use]
    pub fn in_flight(&self) -> usize {
        *self.in_flight.lock()
    }

    /// Whether any request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        *self.busy.borrow()
    }

    /// Observe the busy flag
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the tracker on drop, including when the request future is cancelled
#[derive(Debug)]
pub struct LoadingGuard {
    tracker: Arc<LoadingTracker>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.tracker.end();
    }
}

/// Outermost interceptor: wraps every request in a [`LoadingGuard`]
#[derive(Debug, Clone)]
pub struct LoadingInterceptor {
    tracker: Arc<LoadingTracker>,
}

impl LoadingInterceptor {
    /// Interceptor feeding `tracker`
    #[must_use]
    pub fn new(tracker: Arc<LoadingTracker>) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl Interceptor for LoadingInterceptor {
    fn name(&self) -> &'static str {
        "loading"
    }

    async fn intercept(
        &self,
        request: HttpRequest,
        next: Next<'_>,
    ) -> Result<HttpResponse, HttpError> {
        let _guard = self.tracker.begin();
        next.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_while_any_guard_lives() {
        let tracker = Arc::new(LoadingTracker::new());
        let rx = tracker.subscribe();

        let first = tracker.begin();
        let second = tracker.begin();
        assert_eq!(tracker.in_flight(), 2);
        assert!(*rx.borrow());

        drop(first);
        assert!(tracker.is_loading());

        drop(second);
        assert!(!tracker.is_loading());
        assert_eq!(tracker.in_flight(), 0);
    }

    #[tokio::test]
    async fn cancelled_request_still_decrements() {
        let tracker = Arc::new(LoadingTracker::new());
        let held = Arc::clone(&tracker);
        let task = tokio::spawn(async move {
            let _guard = held.begin();
            std::future::pending::<()>().await;
        });
        tokio::task::yield_now().await;
        while tracker.in_flight() == 0 {
            tokio::task::yield_now().await;
        }

        task.abort();
        let _ = task.await;

        assert_eq!(tracker.in_flight(), 0);
        assert!(!tracker.is_loading());
    }
}
