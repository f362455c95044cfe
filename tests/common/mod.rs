//! Shared utilities for navigation integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use navcore::{
    HistoryAdapter, LoadFailure, MemoryHistory, NavigationState, RouteDefinition, RouteTable,
    Router, ViewLoader, ViewProvider, ViewUnit,
};
use tokio::sync::{watch, Semaphore};

/// A lazy component whose fetches block until released.
#[derive(Clone)]
pub struct GatedComponent {
    pub calls: Arc<AtomicUsize>,
    gate: Arc<Semaphore>,
}

#[allow(dead_code)]
impl GatedComponent {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Let every pending and future fetch complete.
    pub fn open(&self) {
        self.gate.add_permits(1024);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn route(&self, path: &str, name: &str, component: &str) -> RouteDefinition {
        let calls = self.calls.clone();
        let gate = self.gate.clone();
        let component = component.to_string();
        RouteDefinition::new(
            path,
            name,
            ViewProvider::lazy(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                let gate = gate.clone();
                let component = component.clone();
                async move {
                    let _permit = gate
                        .acquire()
                        .await
                        .map_err(|e| LoadFailure::Fetch(e.to_string()))?;
                    Ok(ViewUnit::new(component))
                }
            }),
        )
    }
}

#[allow(dead_code)]
pub fn eager(path: &str, name: &str, component: &str) -> RouteDefinition {
    RouteDefinition::new(path, name, ViewProvider::eager(ViewUnit::new(component)))
}

/// Build a router over an in-memory history starting at `initial`.
pub fn router(routes: Vec<RouteDefinition>, initial: &str) -> Arc<Router> {
    router_with_history(routes, HistoryAdapter::new(MemoryHistory::new(initial)))
}

/// Build a router over a preconfigured history adapter.
pub fn router_with_history(routes: Vec<RouteDefinition>, history: HistoryAdapter) -> Arc<Router> {
    Arc::new(Router::new(
        Arc::new(RouteTable::register(routes).expect("valid routes")),
        ViewLoader::new(None),
        Arc::new(history),
    ))
}

/// Wait for a settled state produced by an attempt newer than `after`.
#[allow(dead_code)]
pub async fn settled_after(
    states: &mut watch::Receiver<NavigationState>,
    after: u64,
) -> NavigationState {
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        states.wait_for(|s| s.attempt > after && s.is_settled()),
    )
    .await
    .expect("navigation did not settle")
    .expect("router dropped");
    state.clone()
}
