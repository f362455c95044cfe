//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteDefinition[] (path, name, provider)
//!     → pattern.rs (compile literal / :param / *wildcard segments)
//!     → table.rs (reject duplicate names, freeze as immutable RouteTable)
//!
//! Navigation target (path string):
//!     → matcher.rs (split query/fragment, walk table in declaration order)
//!     → Return: MatchResult or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: segment-wise comparison only
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order, not specificity)

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod table;

pub use error::RouteError;
pub use matcher::{MatchResult, Matcher};
pub use pattern::RoutePattern;
pub use table::{RouteDefinition, RouteTable, ViewProvider};
