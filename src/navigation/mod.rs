//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! HistoryAdapter event (path)
//!     → router.rs begin(): issue token, Matcher, ViewLoader
//!         → NoMatch: publish NotFound
//!         → Ready view: publish Resolved
//!         → Pending view: publish Resolving, spawn complete()
//!     → router.rs complete(): publish Resolved / Failed if token is current
//!     → state.rs NavigationState via watch channel to the shell
//! ```

pub mod router;
pub mod state;

pub use router::{NavigationTarget, PendingAttempt, Router};
pub use state::{NavigationState, RouterStatus};
