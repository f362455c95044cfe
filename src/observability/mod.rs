//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (route, attempt, path)
//!     → metrics.rs (navigation outcomes, lazy fetches, cache size)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, level from config or RUST_LOG)
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - No recorder installed here: without one, metric calls are no-ops
//! - Log level configurable via config and environment

pub mod logging;
pub mod metrics;
