//! Component sources for lazily loaded views.
//!
//! A `ComponentSource` is whatever can fetch a component's code chunk:
//! a bundler's dynamic import in a browser host, or the in-process
//! `SimulatedSource` used by the demo binary and tests.

use std::collections::HashSet;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};

use crate::view::{LoadFailure, ViewUnit};

/// Fetches lazily loaded components by identifier.
pub trait ComponentSource: Send + Sync {
    fn fetch(&self, component: &str, chunk: Option<&str>) -> BoxFuture<'static, Result<ViewUnit, LoadFailure>>;
}

/// Serves a fixed set of components after a fixed latency.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    known: HashSet<String>,
    failing: HashSet<String>,
    latency: Duration,
}

impl SimulatedSource {
    /// A source that answers every fetch after `latency`.
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Register a component that fetches successfully.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.known.insert(component.into());
        self
    }

    /// Make every fetch of `component` fail.
    pub fn with_failure(mut self, component: impl Into<String>) -> Self {
        self.failing.insert(component.into());
        self
    }
}

impl ComponentSource for SimulatedSource {
    fn fetch(&self, component: &str, chunk: Option<&str>) -> BoxFuture<'static, Result<ViewUnit, LoadFailure>> {
        let latency = self.latency;
        let component = component.to_string();
        let chunk = chunk.map(str::to_string);
        let known = self.known.contains(&component);
        let failing = self.failing.contains(&component);

        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if failing {
                return Err(LoadFailure::Fetch(format!("chunk for '{component}' unavailable")));
            }
            if !known {
                return Err(LoadFailure::UnknownComponent(component));
            }
            let unit = ViewUnit::new(component);
            Ok(match chunk {
                Some(chunk) => unit.with_chunk(chunk),
                None => unit,
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_source() {
        let source = SimulatedSource::new(Duration::ZERO)
            .with_component("Schedule")
            .with_component("Broken")
            .with_failure("Broken");

        let unit = source.fetch("Schedule", Some("schedule.js")).await.unwrap();
        assert_eq!(unit, ViewUnit::new("Schedule").with_chunk("schedule.js"));

        assert!(matches!(
            source.fetch("Broken", None).await,
            Err(LoadFailure::Fetch(_))
        ));
        assert_eq!(
            source.fetch("Missing", None).await.unwrap_err(),
            LoadFailure::UnknownComponent("Missing".into())
        );
    }
}
