//! Navigation history subsystem.
//!
//! # Data Flow
//! ```text
//! Router.go_to / shell ──▶ adapter.rs navigate(path, Push | Replace)
//! Platform back/forward ──▶ adapter.rs go(delta)
//!                              → backend.rs (platform history, injected)
//!                              → broadcast NavigationEvent to subscribers
//! ```
//!
//! # Design Decisions
//! - The platform history is an injected trait object, never a global
//! - `HistoryAdapter` is the only code that mutates it
//! - Events are sent under the backend lock so subscribers observe
//!   changes in the order they happened

pub mod adapter;
pub mod backend;

pub use adapter::{ChangeCause, HistoryAdapter, NavigationEvent, NavigationMode};
pub use backend::{HistoryBackend, MemoryHistory};
