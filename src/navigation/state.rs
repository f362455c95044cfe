//! Navigation state published to the application shell.
//!
//! # States
//! - Idle: startup, before the first navigation attempt
//! - Resolving: route matched, lazy view still loading
//! - Resolved: route matched and view ready
//! - NotFound: no route matched the path
//! - Failed: route matched but its view could not be loaded
//!
//! # State Transitions
//! ```text
//! any ──(path change)──▶ Resolving
//! Resolving ──(no match)──▶ NotFound
//! Resolving ──(view ready)──▶ Resolved
//! Resolving ──(load failure)──▶ Failed
//! ```
//!
//! # Design Decisions
//! - Each attempt carries a monotonically increasing token; results for an
//!   older token are dropped
//! - `Failed` keeps the match so the shell can still show route metadata

use serde::Serialize;

use crate::routing::MatchResult;
use crate::view::{LoadFailure, LoadedView};

/// Router state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterStatus {
    Idle,
    Resolving,
    Resolved,
    NotFound,
    Failed,
}

/// Process-wide navigation state, owned by the router.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationState {
    /// Token of the attempt that produced this state (0 before the first).
    pub attempt: u64,
    /// Path the attempt was started for.
    pub path: String,
    pub status: RouterStatus,
    /// Active match, `None` for Idle and NotFound.
    pub matched: Option<MatchResult>,
    /// Active view, present only when Resolved.
    pub view: Option<LoadedView>,
    /// Load failure, present only when Failed.
    pub failure: Option<LoadFailure>,
}

impl NavigationState {
    /// The state before the first navigation.
    pub fn idle(path: impl Into<String>) -> Self {
        Self {
            attempt: 0,
            path: path.into(),
            status: RouterStatus::Idle,
            matched: None,
            view: None,
            failure: None,
        }
    }

    /// A matched route whose lazy view is still loading.
    pub fn resolving(attempt: u64, path: impl Into<String>, matched: MatchResult) -> Self {
        Self {
            attempt,
            path: path.into(),
            status: RouterStatus::Resolving,
            matched: Some(matched),
            view: None,
            failure: None,
        }
    }

    /// A matched route with its view ready.
    pub fn resolved(attempt: u64, path: impl Into<String>, matched: MatchResult, view: LoadedView) -> Self {
        Self {
            view: Some(view),
            status: RouterStatus::Resolved,
            ..Self::resolving(attempt, path, matched)
        }
    }

    /// No route matched `path`.
    pub fn not_found(attempt: u64, path: impl Into<String>) -> Self {
        Self {
            attempt,
            status: RouterStatus::NotFound,
            ..Self::idle(path)
        }
    }

    /// Complete a Resolving state with the outcome of its view load.
    pub fn settle(&mut self, outcome: Result<LoadedView, LoadFailure>) {
        match outcome {
            Ok(view) => {
                self.status = RouterStatus::Resolved;
                self.view = Some(view);
                self.failure = None;
            }
            Err(failure) => {
                self.status = RouterStatus::Failed;
                self.view = None;
                self.failure = Some(failure);
            }
        }
    }

    /// Name of the active route, if any.
    pub fn route_name(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.name.as_str())
    }

    /// True once the attempt has reached a final state.
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            RouterStatus::Resolved | RouterStatus::NotFound | RouterStatus::Failed
        )
    }
}
