//! History adapter: the single mutation point for navigation history.
//!
//! # Responsibilities
//! - Expose the current path
//! - Push / replace entries and traverse back and forward
//! - Broadcast a `NavigationEvent` whenever the observable path changes
//!
//! # Design Decisions
//! - A push or replace to the exact current path is redundant: the history
//!   is left untouched and no event is emitted
//! - Subscribers that fall behind receive `Lagged` and should resync
//!   from `current_path()`

use std::future::Future;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::history::HistoryBackend;

/// Default capacity of the event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// How `navigate` records the new path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    /// Append a new history entry.
    #[default]
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// What caused a path change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeCause {
    Push,
    Replace,
    /// Back / forward / go(delta).
    Traverse,
}

/// Emitted whenever the observable path changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEvent {
    pub path: String,
    pub cause: ChangeCause,
}

/// Wraps the platform history and notifies subscribers of changes.
pub struct HistoryAdapter {
    backend: Mutex<Box<dyn HistoryBackend>>,
    events: broadcast::Sender<NavigationEvent>,
}

impl HistoryAdapter {
    /// Wrap `backend` with the default event capacity.
    pub fn new(backend: impl HistoryBackend + 'static) -> Self {
        Self::with_capacity(backend, DEFAULT_EVENT_CAPACITY)
    }

    /// Wrap `backend`; subscribers lag after `capacity` unread events.
    pub fn with_capacity(backend: impl HistoryBackend + 'static, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            backend: Mutex::new(Box::new(backend)),
            events,
        }
    }

    /// The path of the current history entry.
    pub fn current_path(&self) -> String {
        self.lock().location()
    }

    /// Number of entries in the platform history.
    pub fn depth(&self) -> usize {
        self.lock().depth()
    }

    /// Record a new path. Returns `false` when `path` is already current.
    pub fn navigate(&self, path: &str, mode: NavigationMode) -> bool {
        let mut backend = self.lock();

        if backend.location() == path {
            tracing::debug!(path = %path, mode = ?mode, "Redundant navigation ignored");
            return false;
        }

        let cause = match mode {
            NavigationMode::Push => {
                backend.push(path);
                ChangeCause::Push
            }
            NavigationMode::Replace => {
                backend.replace(path);
                ChangeCause::Replace
            }
        };

        tracing::debug!(path = %path, cause = ?cause, depth = backend.depth(), "History updated");
        self.emit(path.to_string(), cause);
        true
    }

    /// Step one entry back. Returns `false` at the oldest entry.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Step one entry forward. Returns `false` at the newest entry.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Traverse `delta` entries. Returns `false` at either end of the stack.
    pub fn go(&self, delta: isize) -> bool {
        let mut backend = self.lock();
        match backend.go(delta) {
            Some(path) => {
                tracing::debug!(path = %path, delta, "History traversed");
                self.emit(path, ChangeCause::Traverse);
                true
            }
            None => false,
        }
    }

    /// Subscribe to path changes.
    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    /// Invoke `callback` for every subsequent path change.
    ///
    /// Runs on a spawned task until the adapter is dropped.
    pub fn on_change<F, Fut>(&self, callback: F) -> JoinHandle<()>
    where
        F: Fn(NavigationEvent) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut events = self.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => callback(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Change listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn emit(&self, path: String, cause: ChangeCause) {
        // No subscribers is not an error.
        let _ = self.events.send(NavigationEvent { path, cause });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Box<dyn HistoryBackend>> {
        self.backend.lock().expect("history mutex poisoned")
    }
}

impl std::fmt::Debug for HistoryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryAdapter")
            .field("backend", &*self.lock())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;

    #[test]
    fn test_navigate_emits_events() {
        let adapter = HistoryAdapter::new(MemoryHistory::new("/"));
        let mut events = adapter.subscribe();

        assert!(adapter.navigate("/config", NavigationMode::Push));
        assert!(adapter.navigate("/item/1", NavigationMode::Replace));

        assert_eq!(
            events.try_recv().unwrap(),
            NavigationEvent { path: "/config".into(), cause: ChangeCause::Push }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            NavigationEvent { path: "/item/1".into(), cause: ChangeCause::Replace }
        );
        assert_eq!(adapter.depth(), 2);
        assert_eq!(adapter.current_path(), "/item/1");
    }

    #[test]
    fn test_redundant_push_ignored() {
        let adapter = HistoryAdapter::new(MemoryHistory::new("/config"));
        let mut events = adapter.subscribe();

        assert!(!adapter.navigate("/config", NavigationMode::Push));
        assert_eq!(adapter.depth(), 1);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_replace_with_current_path_emits_nothing() {
        let adapter = HistoryAdapter::new(MemoryHistory::new("/"));
        adapter.navigate("/config", NavigationMode::Push);
        let mut events = adapter.subscribe();

        assert!(!adapter.navigate("/config", NavigationMode::Replace));
        assert!(events.try_recv().is_err());
        assert_eq!(adapter.depth(), 2);

        assert!(adapter.navigate("/item/1", NavigationMode::Replace));
        assert_eq!(events.try_recv().unwrap().cause, ChangeCause::Replace);
        assert_eq!(adapter.depth(), 2);
    }

    #[test]
    fn test_back_and_forward() {
        let adapter = HistoryAdapter::new(MemoryHistory::new("/"));
        adapter.navigate("/config", NavigationMode::Push);
        let mut events = adapter.subscribe();

        assert!(adapter.back());
        assert!(!adapter.back());
        assert!(adapter.forward());

        let paths: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
            .map(|e| (e.path, e.cause))
            .collect();
        assert_eq!(
            paths,
            [
                ("/".to_string(), ChangeCause::Traverse),
                ("/config".to_string(), ChangeCause::Traverse),
            ]
        );
    }

    #[tokio::test]
    async fn test_on_change_callback() {
        let adapter = HistoryAdapter::new(MemoryHistory::default());
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let _listener = adapter.on_change(move |event| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(event.path);
            }
        });

        adapter.navigate("/config", NavigationMode::Push);
        assert_eq!(rx.recv().await.as_deref(), Some("/config"));
    }
}
