//! View unit types and load failures.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a route obtains its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Available without asynchronous work.
    Eager,
    /// Fetched on first use, cached afterwards.
    Lazy,
}

/// A reference to a view-producing component owned by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewUnit {
    /// Component identifier (e.g. `"Schedule"`).
    pub component: String,
    /// Code chunk the component was loaded from, for lazy units.
    pub chunk: Option<String>,
}

impl ViewUnit {
    /// A unit for `component` with no chunk.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            chunk: None,
        }
    }

    /// Record the chunk the component came from.
    pub fn with_chunk(mut self, chunk: impl Into<String>) -> Self {
        self.chunk = Some(chunk.into());
        self
    }
}

/// A resolved, ready-to-render view.
///
/// Cloning is cheap and preserves identity, so a cached lazy view can be
/// compared with [`LoadedView::ptr_eq`].
#[derive(Debug, Clone)]
pub struct LoadedView(Arc<ViewUnit>);

impl LoadedView {
    /// Wrap a unit as a shareable loaded view.
    pub fn new(unit: ViewUnit) -> Self {
        Self(Arc::new(unit))
    }

    /// True if both handles point at the same loaded instance.
    pub fn ptr_eq(&self, other: &LoadedView) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for LoadedView {
    type Target = ViewUnit;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for LoadedView {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// A lazy view could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// The underlying fetch reported an error.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The fetch did not complete within the configured limit.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The component source has no such component.
    #[error("unknown component '{0}'")]
    UnknownComponent(String),
}

impl Serialize for LoadFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
