//! Route table errors.

use thiserror::Error;

/// Errors raised while building the route table or resolving a route by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Two definitions share a name. Fatal at startup.
    #[error("duplicate route name '{0}'")]
    DuplicateName(String),

    /// The path pattern could not be compiled.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No route is registered under this name.
    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// A parameter required by the pattern was not supplied.
    #[error("missing parameter '{param}' for pattern '{pattern}'")]
    MissingParam { pattern: String, param: String },

    /// A parameter value contains a character that would change the path's
    /// structure (`/` outside a wildcard, `?` or `#`).
    #[error("parameter '{param}' has value '{value}' that cannot appear in a path segment")]
    InvalidParam { param: String, value: String },
}
