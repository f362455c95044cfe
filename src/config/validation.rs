//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Route names unique and non-empty, patterns compile
//! - Value ranges (event capacity > 0, initial path absolute)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NavConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::NavConfig;
use crate::routing::RoutePattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{0} has an empty name")]
    EmptyRouteName(usize),

    #[error("duplicate route name '{0}'")]
    DuplicateRouteName(String),

    #[error("route '{route}': {reason}")]
    InvalidPattern { route: String, reason: String },

    #[error("route '{0}' has an empty component")]
    EmptyComponent(String),

    #[error("history.initial_path '{0}' must start with '/'")]
    InvalidInitialPath(String),

    #[error("history.event_capacity must be greater than zero")]
    ZeroEventCapacity,
}

/// Check a parsed configuration.
pub fn validate_config(config: &NavConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName(index));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        if let Err(err) = RoutePattern::parse(&route.path) {
            errors.push(ValidationError::InvalidPattern {
                route: route.name.clone(),
                reason: err.to_string(),
            });
        }

        if route.component.trim().is_empty() {
            errors.push(ValidationError::EmptyComponent(route.name.clone()));
        }
    }

    if !config.history.initial_path.starts_with('/') {
        errors.push(ValidationError::InvalidInitialPath(
            config.history.initial_path.clone(),
        ));
    }

    if config.history.event_capacity == 0 {
        errors.push(ValidationError::ZeroEventCapacity);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;
    use crate::view::ProviderKind;

    fn route(name: &str, path: &str, component: &str) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            path: path.into(),
            provider: ProviderKind::Eager,
            component: component.into(),
            chunk: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&NavConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = NavConfig::default();
        config.routes = vec![
            route("schedule", "/", "Schedule"),
            route("schedule", "/again", "Schedule"),
            route("", "/blank", "Blank"),
            route("bad", "bad", ""),
        ];
        config.history.initial_path = "config".into();
        config.history.event_capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&ValidationError::DuplicateRouteName("schedule".into())));
        assert!(errors.contains(&ValidationError::EmptyRouteName(2)));
        assert!(errors.contains(&ValidationError::EmptyComponent("bad".into())));
        assert!(errors.contains(&ValidationError::ZeroEventCapacity));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidPattern { route, .. } if route == "bad")));
    }
}
