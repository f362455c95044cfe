//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → RouteTable → ViewLoader → HistoryAdapter → Router
//!
//! Shutdown (shutdown.rs):
//!     trigger() → Router::run loop exits
//! ```
//!
//! # Design Decisions
//! - Fail fast: an invalid route table is fatal, the router never starts
//! - Subsystems initialize in order, not concurrently

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_router, build_table, StartupError};
