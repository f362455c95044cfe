//! Route definitions and the frozen route table.
//!
//! # Responsibilities
//! - Hold route definitions as plain values (path, name, provider)
//! - Compile every pattern once at registration
//! - Reject duplicate names and malformed patterns
//! - Resolve a route name back to a concrete path
//!
//! # Design Decisions
//! - No mutation after `register`; share via `Arc<RouteTable>`
//! - Declaration order is preserved and is the match order

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use crate::routing::{RouteError, RoutePattern};
use crate::view::{LoadFailure, LoadedView, ProviderKind, ViewUnit};

/// Zero-argument function returning a pending view fetch.
pub type LazyFetch =
    Arc<dyn Fn() -> BoxFuture<'static, Result<ViewUnit, LoadFailure>> + Send + Sync>;

/// Where a route's view comes from.
#[derive(Clone)]
pub enum ViewProvider {
    Eager(LoadedView),
    Lazy(LazyFetch),
}

impl ViewProvider {
    /// A view that is available immediately.
    pub fn eager(unit: ViewUnit) -> Self {
        Self::Eager(LoadedView::new(unit))
    }

    /// A view fetched by `fetch` on first navigation, then cached.
    pub fn lazy<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ViewUnit, LoadFailure>> + Send + 'static,
    {
        Self::Lazy(Arc::new(move || fetch().boxed()))
    }

    /// Eager or lazy, for logs and config.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Eager(_) => ProviderKind::Eager,
            Self::Lazy(_) => ProviderKind::Lazy,
        }
    }
}

impl fmt::Debug for ViewProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eager(view) => f.debug_tuple("Eager").field(&view.component).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

/// A single route as supplied by the application.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub path: String,
    pub name: String,
    pub provider: ViewProvider,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>, name: impl Into<String>, provider: ViewProvider) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            provider,
        }
    }
}

#[derive(Debug)]
struct CompiledRoute {
    definition: RouteDefinition,
    pattern: RoutePattern,
}

/// Ordered, immutable collection of routes.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Build the table from the full ordered list of definitions.
    pub fn register(definitions: Vec<RouteDefinition>) -> Result<Self, RouteError> {
        let mut routes = Vec::with_capacity(definitions.len());
        let mut by_name = HashMap::with_capacity(definitions.len());

        for definition in definitions {
            if by_name.contains_key(&definition.name) {
                return Err(RouteError::DuplicateName(definition.name));
            }
            let pattern = RoutePattern::parse(&definition.path)?;
            by_name.insert(definition.name.clone(), routes.len());

            tracing::debug!(
                route = %definition.name,
                pattern = %definition.path,
                provider = ?definition.provider.kind(),
                "Route registered"
            );
            routes.push(CompiledRoute {
                definition,
                pattern,
            });
        }

        Ok(Self { routes, by_name })
    }

    /// Look up a definition by route name.
    pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
        self.by_name
            .get(name)
            .map(|&index| &self.routes[index].definition)
    }

    /// Routes with their compiled patterns, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RouteDefinition, &RoutePattern)> {
        self.routes.iter().map(|r| (&r.definition, &r.pattern))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build the concrete path for a named route.
    pub fn build_path(
        &self,
        name: &str,
        params: &HashMap<String, String>,
    ) -> Result<String, RouteError> {
        let index = self
            .by_name
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        self.routes[*index].pattern.build(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eager(path: &str, name: &str) -> RouteDefinition {
        RouteDefinition::new(path, name, ViewProvider::eager(ViewUnit::new(name)))
    }

    #[test]
    fn test_register_preserves_order() {
        let table = RouteTable::register(vec![
            eager("/", "schedule"),
            eager("/config", "config"),
        ])
        .unwrap();

        let names: Vec<_> = table.iter().map(|(d, _)| d.name.as_str()).collect();
        assert_eq!(names, ["schedule", "config"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("config").unwrap().path, "/config");
        assert!(table.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = RouteTable::register(vec![eager("/a", "same"), eager("/b", "same")]).unwrap_err();
        assert_eq!(err, RouteError::DuplicateName("same".into()));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = RouteTable::register(vec![eager("no-slash", "bad")]).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_build_path_by_name() {
        let table = RouteTable::register(vec![eager("/item/:id", "item")]).unwrap();
        let params = HashMap::from([("id".to_string(), "42".to_string())]);

        assert_eq!(table.build_path("item", &params).unwrap(), "/item/42");
        assert_eq!(
            table.build_path("nope", &params).unwrap_err(),
            RouteError::UnknownRoute("nope".into())
        );
    }

    #[test]
    fn test_provider_kind() {
        let lazy = ViewProvider::lazy(|| async { Ok::<_, LoadFailure>(ViewUnit::new("Schedule")) });
        assert_eq!(lazy.kind(), ProviderKind::Lazy);
        assert_eq!(format!("{lazy:?}"), "Lazy(..)");
        assert_eq!(ViewProvider::eager(ViewUnit::new("Config")).kind(), ProviderKind::Eager);
    }
}
