//! Client-side navigation core for single-page applications.
//!
//! Maps a requested path to a view-producing unit, loads that unit's code
//! (eagerly or lazily, with caching), and keeps navigation history and
//! the visible view in sync.

pub mod config;
pub mod history;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod routing;
pub mod view;

pub use config::NavConfig;
pub use history::{HistoryAdapter, MemoryHistory, NavigationMode};
pub use lifecycle::Shutdown;
pub use navigation::{NavigationState, NavigationTarget, Router, RouterStatus};
pub use routing::{RouteDefinition, RouteTable, ViewProvider};
pub use view::{LoadFailure, LoadedView, ViewLoader, ViewUnit};
