//! View loading subsystem.
//!
//! # Data Flow
//! ```text
//! RouteDefinition.provider
//!     → Eager: LoadedView handed back immediately
//!     → Lazy:  loader.rs checks the cache
//!              → hit: cached LoadedView
//!              → miss: join or start the single in-flight fetch
//!                      → success: cache by route name
//!                      → failure: nothing cached, next load refetches
//! ```
//!
//! # Design Decisions
//! - The cache lives for the whole process; entries never expire
//! - At most one outstanding fetch per route
//! - Pending loads are an explicit value (`ViewLoad::Pending`), not hidden awaits

pub mod loader;
pub mod source;
pub mod types;

pub use loader::{PendingView, ViewLoad, ViewLoader};
pub use source::{ComponentSource, SimulatedSource};
pub use types::{LoadFailure, LoadedView, ProviderKind, ViewUnit};
