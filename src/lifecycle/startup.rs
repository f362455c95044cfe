//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn route configuration into a frozen `RouteTable`
//! - Wire lazy routes to the component source
//! - Build the loader, history adapter and router in dependency order

use std::sync::Arc;

use thiserror::Error;

use crate::config::{NavConfig, RouteConfig};
use crate::history::{HistoryAdapter, HistoryBackend};
use crate::navigation::Router;
use crate::routing::{RouteDefinition, RouteError, RouteTable, ViewProvider};
use crate::view::{ComponentSource, ProviderKind, ViewLoader, ViewUnit};

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteError),
}

fn definition(route: &RouteConfig, source: &Arc<dyn ComponentSource>) -> RouteDefinition {
    let provider = match route.provider {
        ProviderKind::Eager => {
            let unit = ViewUnit::new(route.component.clone());
            ViewProvider::eager(match &route.chunk {
                Some(chunk) => unit.with_chunk(chunk.clone()),
                None => unit,
            })
        }
        ProviderKind::Lazy => {
            let source = Arc::clone(source);
            let component = route.component.clone();
            let chunk = route.chunk.clone();
            ViewProvider::lazy(move || source.fetch(&component, chunk.as_deref()))
        }
    };
    RouteDefinition::new(route.path.clone(), route.name.clone(), provider)
}

/// Build the route table from configuration.
pub fn build_table(
    routes: &[RouteConfig],
    source: Arc<dyn ComponentSource>,
) -> Result<RouteTable, RouteError> {
    RouteTable::register(routes.iter().map(|r| definition(r, &source)).collect())
}

/// Build a router over `history` from a validated configuration.
pub fn build_router(
    config: &NavConfig,
    source: Arc<dyn ComponentSource>,
    history: impl HistoryBackend + 'static,
) -> Result<Arc<Router>, StartupError> {
    let table = Arc::new(build_table(&config.routes, source)?);
    let loader = ViewLoader::new(config.loader.fetch_timeout());
    let history = Arc::new(HistoryAdapter::with_capacity(
        history,
        config.history.event_capacity,
    ));

    tracing::info!(
        routes = table.len(),
        fetch_timeout_ms = config.loader.fetch_timeout_ms,
        "Navigation core initialized"
    );

    Ok(Arc::new(Router::new(table, loader, history)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::history::MemoryHistory;
    use crate::navigation::RouterStatus;
    use crate::view::SimulatedSource;
    use std::time::Duration;

    const ROUTES: &str = r#"
        [[routes]]
        name = "schedule"
        path = "/"
        provider = "lazy"
        component = "Schedule"

        [[routes]]
        name = "config"
        path = "/config"
        component = "Config"
    "#;

    #[tokio::test]
    async fn test_router_from_config() {
        let config = parse_config(ROUTES).unwrap();
        let source = Arc::new(SimulatedSource::new(Duration::ZERO).with_component("Schedule"));
        let router = build_router(&config, source, MemoryHistory::new("/")).unwrap();

        let state = router.resolve("/").await;
        assert_eq!(state.status, RouterStatus::Resolved);
        assert_eq!(state.view.unwrap().component, "Schedule");
        assert!(router.loader().is_cached("schedule"));

        let state = router.resolve("/config").await;
        assert_eq!(state.route_name(), Some("config"));
        assert!(!router.loader().is_cached("config"));
    }

    #[test]
    fn test_duplicate_names_fail_startup() {
        let mut config = parse_config(ROUTES).unwrap();
        config.routes[1].name = "schedule".into();

        let err = build_router(
            &config,
            Arc::new(SimulatedSource::default()),
            MemoryHistory::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StartupError::Routes(RouteError::DuplicateName(_))));
    }
}
