//! Lazy view loading and caching.
//!
//! # Responsibilities
//! - Turn a route's provider into a `LoadedView`
//! - Cache successful lazy fetches by route name
//! - Share one in-flight fetch between concurrent loads of the same route
//! - Enforce the optional fetch timeout
//!
//! # Design Decisions
//! - The cache is written only from inside the shared fetch future
//! - Failures are never cached; the in-flight slot is cleared so the next
//!   load starts from scratch
//! - In-flight entries carry a fetch id so a finished fetch only removes
//!   its own slot

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::observability::metrics;
use crate::routing::table::LazyFetch;
use crate::routing::{RouteDefinition, ViewProvider};
use crate::view::{LoadFailure, LoadedView};

type SharedFetch = Shared<BoxFuture<'static, Result<LoadedView, LoadFailure>>>;

struct InFlight {
    id: u64,
    fetch: SharedFetch,
}

struct LoaderInner {
    cache: DashMap<String, LoadedView>,
    in_flight: DashMap<String, InFlight>,
    next_fetch_id: AtomicU64,
    fetch_timeout: Option<Duration>,
}

/// Result of asking for a route's view.
#[derive(Debug)]
pub enum ViewLoad {
    /// Eager view or cached lazy view.
    Ready(LoadedView),
    /// A lazy fetch is outstanding.
    Pending(PendingView),
}

/// Handle on an outstanding (possibly shared) lazy fetch.
#[must_use = "a pending view does nothing unless resolved"]
pub struct PendingView {
    route: String,
    fetch: SharedFetch,
}

impl PendingView {
    /// Name of the route being fetched.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Wait for the fetch to finish.
    pub async fn resolve(self) -> Result<LoadedView, LoadFailure> {
        self.fetch.await
    }
}

impl fmt::Debug for PendingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingView")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

/// Resolves providers into views. Cheap to clone; clones share the cache.
#[derive(Clone)]
pub struct ViewLoader {
    inner: Arc<LoaderInner>,
}

impl ViewLoader {
    /// Create a loader. `fetch_timeout` of `None` waits indefinitely.
    pub fn new(fetch_timeout: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(LoaderInner {
                cache: DashMap::new(),
                in_flight: DashMap::new(),
                next_fetch_id: AtomicU64::new(0),
                fetch_timeout,
            }),
        }
    }

    /// Obtain the view for a route.
    pub fn load(&self, route: &RouteDefinition) -> ViewLoad {
        let fetch = match &route.provider {
            ViewProvider::Eager(view) => return ViewLoad::Ready(view.clone()),
            ViewProvider::Lazy(fetch) => fetch,
        };

        if let Some(view) = self.cached(&route.name) {
            return ViewLoad::Ready(view);
        }

        let shared = match self.inner.in_flight.entry(route.name.clone()) {
            Entry::Occupied(entry) => {
                tracing::debug!(route = %route.name, "Joining in-flight fetch");
                entry.get().fetch.clone()
            }
            Entry::Vacant(entry) => {
                // A fetch may have finished between the cache check and the
                // entry lock; it caches before clearing its slot.
                if let Some(view) = self.cached(&route.name) {
                    return ViewLoad::Ready(view);
                }
                let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                let shared = self.start_fetch(route.name.clone(), id, fetch.clone());
                entry.insert(InFlight {
                    id,
                    fetch: shared.clone(),
                });
                tracing::debug!(route = %route.name, fetch_id = id, "Lazy fetch started");
                shared
            }
        };

        ViewLoad::Pending(PendingView {
            route: route.name.clone(),
            fetch: shared,
        })
    }

    /// The cached lazy view for a route, if any.
    pub fn cached(&self, route: &str) -> Option<LoadedView> {
        self.inner.cache.get(route).map(|r| r.value().clone())
    }

    /// True if a lazy view for this route has been cached.
    pub fn is_cached(&self, route: &str) -> bool {
        self.inner.cache.contains_key(route)
    }

    /// Number of cached lazy views.
    pub fn cached_count(&self) -> usize {
        self.inner.cache.len()
    }

    /// True while a fetch for this route is outstanding.
    pub fn is_loading(&self, route: &str) -> bool {
        self.inner.in_flight.contains_key(route)
    }

    fn start_fetch(&self, route: String, id: u64, fetch: LazyFetch) -> SharedFetch {
        let inner = Arc::clone(&self.inner);

        async move {
            let started = Instant::now();
            let outcome = match inner.fetch_timeout {
                Some(limit) => tokio::time::timeout(limit, fetch())
                    .await
                    .unwrap_or(Err(LoadFailure::Timeout(limit))),
                None => fetch().await,
            };

            let result = match outcome {
                Ok(unit) => {
                    let view = inner
                        .cache
                        .entry(route.clone())
                        .or_insert_with(|| LoadedView::new(unit))
                        .clone();
                    metrics::record_lazy_fetch("success");
                    metrics::record_cache_size(inner.cache.len());
                    tracing::info!(
                        route = %route,
                        component = %view.component,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Lazy view loaded"
                    );
                    Ok(view)
                }
                Err(failure) => {
                    metrics::record_lazy_fetch("failure");
                    tracing::warn!(route = %route, error = %failure, "Lazy view fetch failed");
                    Err(failure)
                }
            };

            inner.in_flight.remove_if(&route, |_, slot| slot.id == id);
            result
        }
        .boxed()
        .shared()
    }
}

impl fmt::Debug for ViewLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewLoader")
            .field("cached", &self.inner.cache.len())
            .field("in_flight", &self.inner.in_flight.len())
            .field("fetch_timeout", &self.inner.fetch_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewUnit;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    fn counting_route(name: &str, calls: Arc<AtomicUsize>, gate: Arc<Semaphore>) -> RouteDefinition {
        let component = name.to_string();
        RouteDefinition::new(
            format!("/{name}"),
            name,
            ViewProvider::lazy(move || {
                let calls = calls.clone();
                let gate = gate.clone();
                let component = component.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let _permit = gate.acquire().await.map_err(|e| LoadFailure::Fetch(e.to_string()))?;
                    Ok(ViewUnit::new(component))
                }
            }),
        )
    }

    fn expect_pending(load: ViewLoad) -> PendingView {
        match load {
            ViewLoad::Pending(pending) => pending,
            ViewLoad::Ready(view) => panic!("expected pending load, got {view:?}"),
        }
    }

    #[test]
    fn test_eager_is_ready() {
        let loader = ViewLoader::new(None);
        let route = RouteDefinition::new("/config", "config", ViewProvider::eager(ViewUnit::new("Config")));

        let ViewLoad::Ready(first) = loader.load(&route) else { panic!("eager must be ready") };
        let ViewLoad::Ready(second) = loader.load(&route) else { panic!("eager must be ready") };
        assert!(first.ptr_eq(&second));
        assert!(!loader.is_cached("config"));
    }

    #[tokio::test]
    async fn test_lazy_fetch_runs_once_and_is_cached() {
        let loader = ViewLoader::new(None);
        let calls = Arc::new(AtomicUsize::new(0));
        let route = counting_route("schedule", calls.clone(), Arc::new(Semaphore::new(10)));

        let first = expect_pending(loader.load(&route)).resolve().await.unwrap();
        assert!(loader.is_cached("schedule"));
        assert!(!loader.is_loading("schedule"));

        let ViewLoad::Ready(second) = loader.load(&route) else { panic!("cached view must be ready") };
        assert!(first.ptr_eq(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let loader = ViewLoader::new(None);
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));
        let route = counting_route("schedule", calls.clone(), gate.clone());

        let a = expect_pending(loader.load(&route));
        let b = expect_pending(loader.load(&route));
        assert!(loader.is_loading("schedule"));

        gate.add_permits(1);
        let (a, b) = tokio::join!(a.resolve(), b.resolve());
        assert!(a.unwrap().ptr_eq(&b.unwrap()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_not_cached_and_retried() {
        let loader = ViewLoader::new(None);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let route = RouteDefinition::new(
            "/schedule",
            "schedule",
            ViewProvider::lazy(move || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        Err(LoadFailure::Fetch("chunk unavailable".into()))
                    } else {
                        Ok(ViewUnit::new("Schedule"))
                    }
                }
            }),
        );

        let failed = expect_pending(loader.load(&route)).resolve().await;
        assert_eq!(failed.unwrap_err(), LoadFailure::Fetch("chunk unavailable".into()));
        assert!(!loader.is_cached("schedule"));
        assert!(!loader.is_loading("schedule"));

        let view = expect_pending(loader.load(&route)).resolve().await.unwrap();
        assert_eq!(view.component, "Schedule");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let limit = Duration::from_millis(20);
        let loader = ViewLoader::new(Some(limit));
        let route = counting_route(
            "slow",
            Arc::new(AtomicUsize::new(0)),
            Arc::new(Semaphore::new(0)),
        );

        let result = expect_pending(loader.load(&route)).resolve().await;
        assert_eq!(result.unwrap_err(), LoadFailure::Timeout(limit));
        assert!(!loader.is_cached("slow"));
    }
}
