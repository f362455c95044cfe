//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → NavConfig (validated, immutable)
//!     → lifecycle::startup builds the RouteTable from it
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the route table never reloads
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{HistoryConfig, LoaderConfig, NavConfig, ObservabilityConfig, RouteConfig};
pub use validation::{validate_config, ValidationError};
