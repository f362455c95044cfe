//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the navigation core.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::view::ProviderKind;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct NavConfig {
    /// Route definitions, in match order.
    pub routes: Vec<RouteConfig>,

    /// Lazy view loading settings.
    pub loader: LoaderConfig,

    /// History settings.
    pub history: HistoryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// One route: `{path, name, provider}` plus the component it renders.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,

    /// Path pattern (`/item/:id`, `/files/*rest`).
    pub path: String,

    /// Eager or lazy view provider.
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Component identifier handed to the component source.
    pub component: String,

    /// Code chunk for lazy components.
    #[serde(default)]
    pub chunk: Option<String>,
}

fn default_provider() -> ProviderKind {
    ProviderKind::Eager
}

/// Lazy loading configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Fetch timeout in milliseconds (0 = no timeout).
    pub fetch_timeout_ms: u64,
}

impl LoaderConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 10_000,
        }
    }
}

/// History configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path of the first history entry for in-memory hosts.
    pub initial_path: String,

    /// Capacity of the navigation event channel.
    pub event_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            initial_path: "/".to_string(),
            event_capacity: 64,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
