//! Route pattern compilation.
//!
//! # Responsibilities
//! - Parse a pattern string into literal, parameter and wildcard segments
//! - Match a split path against the compiled segments
//! - Build a concrete path back from a pattern and parameters
//!
//! # Design Decisions
//! - `:name` matches exactly one non-empty segment
//! - `*` / `*name` consumes the remainder of the path and must be last
//! - A trailing slash is a real (empty) segment: `/item/` is not `/item`
//! - Values are not percent-encoded; `build` rejects values that would not
//!   match back to the same parameters

use std::collections::{HashMap, HashSet};

use crate::routing::RouteError;

/// A single compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Wildcard(Option<String>),
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Compile a pattern such as `/item/:id` or `/files/*rest`.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| invalid("must start with '/'"))?;

        let raw: Vec<&str> = rest.split('/').collect();
        let mut segments = Vec::with_capacity(raw.len());
        let mut names = HashSet::new();

        for (index, part) in raw.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                if !names.insert(name) {
                    return Err(invalid(&format!("parameter '{name}' bound twice")));
                }
                Segment::Param(name.to_string())
            } else if let Some(name) = part.strip_prefix('*') {
                if index + 1 != raw.len() {
                    return Err(invalid("wildcard must be the last segment"));
                }
                if name.is_empty() {
                    Segment::Wildcard(None)
                } else {
                    if !names.insert(name) {
                        return Err(invalid(&format!("parameter '{name}' bound twice")));
                    }
                    Segment::Wildcard(Some(name.to_string()))
                }
            } else {
                Segment::Literal(part.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiled segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the pattern has no parameter or wildcard segments.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Match the segments of a path (without its leading `/`).
    ///
    /// Returns the bound parameters when the whole path is consumed.
    pub fn match_segments(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        let mut params = HashMap::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(literal) => {
                    if *path.get(index)? != literal.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = *path.get(index)?;
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), value.to_string());
                }
                Segment::Wildcard(name) => {
                    // Every earlier segment matched, so `index <= path.len()`.
                    if let Some(name) = name {
                        params.insert(name.clone(), path[index..].join("/"));
                    }
                    return Some(params);
                }
            }
        }

        (path.len() == self.segments.len()).then_some(params)
    }

    /// Substitute parameters back into the pattern.
    ///
    /// The built path always matches this pattern with the same parameters.
    pub fn build(&self, params: &HashMap<String, String>) -> Result<String, RouteError> {
        let mut parts = Vec::with_capacity(self.segments.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => parts.push(literal.as_str()),
                Segment::Param(name) => match params.get(name) {
                    Some(value) if !value.is_empty() => {
                        check_value(name, value, &['/', '?', '#'])?;
                        parts.push(value.as_str());
                    }
                    _ => {
                        return Err(RouteError::MissingParam {
                            pattern: self.source.clone(),
                            param: name.clone(),
                        })
                    }
                },
                Segment::Wildcard(Some(name)) => {
                    if let Some(value) = params.get(name) {
                        check_value(name, value, &['?', '#'])?;
                        parts.push(value.trim_start_matches('/'));
                    }
                }
                Segment::Wildcard(None) => {}
            }
        }

        Ok(format!("/{}", parts.join("/")))
    }
}

fn check_value(param: &str, value: &str, reserved: &[char]) -> Result<(), RouteError> {
    if value.contains(reserved) {
        return Err(RouteError::InvalidParam {
            param: param.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
