//! Navigation orchestration.
//!
//! # Responsibilities
//! - Consume history events and start one navigation attempt per event
//! - Match the path, load the view, publish the resulting state
//! - Drop results of superseded attempts
//! - Programmatic navigation by path or by route name
//!
//! # Design Decisions
//! - The synchronous half of an attempt (token, match, publish) runs inline
//!   in event order; only lazy fetch completion runs on a spawned task
//! - The token check and the state write happen under the same channel
//!   lock, so a stale result can never overwrite a newer state
//! - Superseded fetches are not aborted; their output is discarded

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::history::{HistoryAdapter, NavigationMode};
use crate::navigation::{NavigationState, RouterStatus};
use crate::observability::metrics;
use crate::routing::{Matcher, RouteError, RouteTable};
use crate::view::{PendingView, ViewLoad, ViewLoader};

/// Where to navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Path(String),
    Named {
        name: String,
        params: HashMap<String, String>,
    },
}

impl NavigationTarget {
    /// Navigate to a literal path (query and fragment allowed).
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Navigate to a route by name; add parameters with `with_param`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: HashMap::new(),
        }
    }

    /// Bind a parameter. Ignored for path targets.
    pub fn with_param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Self::Named { name, mut params } => {
                params.insert(key.into(), value.into());
                Self::Named { name, params }
            }
            path => path,
        }
    }
}

/// An attempt waiting on a lazy view.
///
/// Must be passed to [`Router::complete`]; dropping it leaves the router
/// in `Resolving` until the next navigation.
#[derive(Debug)]
#[must_use = "pass the attempt to Router::complete or the state stays Resolving"]
pub struct PendingAttempt {
    attempt: u64,
    view: PendingView,
}

impl PendingAttempt {
    /// Token of this attempt.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Name of the matched route.
    pub fn route(&self) -> &str {
        self.view.route()
    }
}

/// The navigation core: owns `NavigationState`.
pub struct Router {
    table: Arc<RouteTable>,
    loader: ViewLoader,
    history: Arc<HistoryAdapter>,
    state: watch::Sender<NavigationState>,
    next_attempt: AtomicU64,
}

impl Router {
    /// Create a router in the Idle state at the history's current path.
    pub fn new(table: Arc<RouteTable>, loader: ViewLoader, history: Arc<HistoryAdapter>) -> Self {
        let initial = history.current_path();
        tracing::info!(path = %initial, routes = table.len(), "Router idle");
        let (state, _) = watch::channel(NavigationState::idle(initial));
        Self {
            table,
            loader,
            history,
            state,
            next_attempt: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn watch(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    /// The frozen route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The view loader and its cache.
    pub fn loader(&self) -> &ViewLoader {
        &self.loader
    }

    /// The history adapter this router follows.
    pub fn history(&self) -> &HistoryAdapter {
        &self.history
    }

    /// Navigate programmatically. Returns `false` for a redundant push.
    pub fn go_to(&self, target: NavigationTarget, mode: NavigationMode) -> Result<bool, RouteError> {
        let path = match target {
            NavigationTarget::Path(path) => path,
            NavigationTarget::Named { name, params } => self.table.build_path(&name, &params)?,
        };
        Ok(self.history.navigate(&path, mode))
    }

    /// Start an attempt for `path`.
    ///
    /// Publishes NotFound or Resolved directly when no fetch is needed;
    /// otherwise publishes Resolving and hands back the pending attempt.
    /// Nothing is published, and `None` is returned, when a newer attempt
    /// has already written the state.
    #[must_use = "a pending attempt must be completed"]
    pub fn begin(&self, path: &str) -> Option<PendingAttempt> {
        let attempt = self.next_attempt.fetch_add(1, Ordering::SeqCst) + 1;

        let Some((route, matched)) = Matcher::new(&self.table).find(path) else {
            tracing::info!(attempt, path = %path, "No route matched");
            if self.publish(NavigationState::not_found(attempt, path)) {
                metrics::record_navigation("not_found");
            }
            return None;
        };

        tracing::debug!(attempt, path = %path, route = %matched.name, "Route matched");

        match self.loader.load(route) {
            ViewLoad::Ready(view) => {
                if self.publish(NavigationState::resolved(attempt, path, matched, view)) {
                    metrics::record_navigation("resolved");
                }
                None
            }
            ViewLoad::Pending(view) => self
                .publish(NavigationState::resolving(attempt, path, matched))
                .then_some(PendingAttempt { attempt, view }),
        }
    }

    /// Write `next` unless a newer attempt already owns the state.
    fn publish(&self, next: NavigationState) -> bool {
        self.state.send_if_modified(|state| {
            if state.attempt > next.attempt {
                tracing::debug!(
                    attempt = next.attempt,
                    current = state.attempt,
                    "Discarding superseded navigation start"
                );
                metrics::record_superseded();
                return false;
            }
            *state = next;
            true
        })
    }

    /// Wait for a pending attempt and publish its outcome if still current.
    ///
    /// Returns `false` when the attempt was superseded.
    pub async fn complete(&self, pending: PendingAttempt) -> bool {
        let PendingAttempt { attempt, view } = pending;
        let route = view.route().to_string();
        let outcome = view.resolve().await;

        self.state.send_if_modified(|state| {
            if state.attempt != attempt {
                tracing::debug!(
                    attempt,
                    current = state.attempt,
                    route = %route,
                    "Discarding superseded navigation result"
                );
                metrics::record_superseded();
                return false;
            }
            state.settle(outcome);
            match state.status {
                RouterStatus::Resolved => metrics::record_navigation("resolved"),
                _ => metrics::record_navigation("failed"),
            }
            true
        })
    }

    /// Run one attempt to completion and return the state it left behind.
    pub async fn resolve(&self, path: &str) -> NavigationState {
        if let Some(pending) = self.begin(path) {
            self.complete(pending).await;
        }
        self.state()
    }

    /// Process history events until shutdown.
    ///
    /// The path current at startup is treated as the first navigation.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let mut events = self.history.subscribe();
        self.dispatch(&self.history.current_path());

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Router stopping");
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) => {
                        tracing::debug!(path = %event.path, cause = ?event.cause, "Path changed");
                        self.dispatch(&event.path);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "History events lagged, resyncing");
                        self.dispatch(&self.history.current_path());
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }

    fn dispatch(self: &Arc<Self>, path: &str) {
        if let Some(pending) = self.begin(path) {
            let router = Arc::clone(self);
            tokio::spawn(async move {
                router.complete(pending).await;
            });
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table.len())
            .field("status", &self.state.borrow().status)
            .finish_non_exhaustive()
    }
}
