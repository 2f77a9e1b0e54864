//! Search-as-you-type debouncing

use crate::resource::Resource;
use crate::service::CrudService;
use crate::store::EntityStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default quiet period before a search goes out
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Forward only the latest value once `delay` passes without a newer one
///
/// A value still pending when `input` closes is flushed immediately.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::Receiver<T>,
    delay: Duration,
) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        while let Some(mut latest) = input.recv().await {
            loop {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => latest = value,
                        None => {
                            // Receiver may already be gone; nothing left to deliver to
                            let _ = tx.send(latest).await;
                            return;
                        }
                    },
                    () = tokio::time::sleep(delay) => break,
                }
            }
            if tx.send(latest).await.is_err() {
                return;
            }
        }
    });
    rx
}

/// Latest debounced search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults<E> {
    /// Query the results belong to
    pub query: String,
    /// Matches
    pub items: Vec<E>,
    /// Failure shown to the user
    pub error: Option<String>,
}

impl<E> Default for SearchResults<E> {
    fn default() -> Self {
        Self {
            query: String::new(),
            items: Vec::new(),
            error: None,
        }
    }
}

/// Debounced search box feeding [`EntityStore::search`]
///
/// Blank queries clear the results without a request. Dropping the box stops
/// the background task.
pub struct SearchBox<E> {
    input: mpsc::Sender<String>,
    results: watch::Receiver<SearchResults<E>>,
    task: JoinHandle<()>,
}

impl<E: Resource> SearchBox<E> {
    /// Spawn a search box over `store`
    pub fn spawn<S>(store: Arc<EntityStore<E, S>>, delay: Duration, limit: u32) -> Self
    where
        S: CrudService<E> + 'static,
    {
        let (input, raw) = mpsc::channel::<String>(32);
        let (publish, results) = watch::channel(SearchResults::default());
        let mut queries = debounce(raw, delay);

        let task = tokio::spawn(async move {
            while let Some(query) = queries.recv().await {
                let trimmed = query.trim();
                let next = if trimmed.is_empty() {
                    SearchResults::default()
                } else {
                    match store.search(trimmed, limit).await {
                        Ok(items) => SearchResults {
                            query: trimmed.to_string(),
                            items,
                            error: None,
                        },
                        Err(e) => SearchResults {
                            query: trimmed.to_string(),
                            items: Vec::new(),
                            error: Some(e.user_message()),
                        },
                    }
                };
                if publish.send(next).is_err() {
                    break;
                }
            }
        });

        Self {
            input,
            results,
            task,
        }
    }

    /// Feed a keystroke's worth of query text
    pub async fn input(&self, query: impl Into<String>) {
        if self.input.send(query.into()).await.is_err() {
            tracing::debug!("search box for {} already stopped", E::LABEL);
        }
    }

    /// Observe results
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchResults<E>> {
        self.results.clone()
    }

    /// Most recent results
    #[must_use]
    pub fn latest(&self) -> SearchResults<E> {
        self.results.borrow().clone()
    }
}

impl<E> Drop for SearchBox<E> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (tx, rx) = mpsc::channel(8);
        let mut out = debounce(rx, SEARCH_DEBOUNCE);

        for value in ["a", "al", "ali"] {
            tx.send(value).await.unwrap();
        }
        assert_eq!(out.recv().await, Some("ali"));

        drop(tx);
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_values_all_pass() {
        let (tx, rx) = mpsc::channel(8);
        let mut out = debounce(rx, SEARCH_DEBOUNCE);

        tx.send(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        tx.send(2).await.unwrap();
        drop(tx);

        assert_eq!(out.recv().await, Some(1));
        assert_eq!(out.recv().await, Some(2));
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_before_quiet_period() {
        let (tx, rx) = mpsc::channel(8);
        let mut out = debounce(rx, SEARCH_DEBOUNCE);

        tx.send("lu").await.unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(out.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(out.try_recv().ok(), Some("lu"));
    }
}
