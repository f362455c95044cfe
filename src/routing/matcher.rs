//! Route matching logic.
//!
//! # Responsibilities
//! - Split a navigation target into path, query and fragment
//! - Walk the route table in declaration order
//! - Return the first route whose pattern consumes the whole path
//!
//! # Design Decisions
//! - Pure: no state, no I/O, never blocks
//! - Path matching is case-sensitive
//! - No backtracking: the first structural match wins

use std::collections::HashMap;

use serde::Serialize;

use crate::routing::{RouteDefinition, RouteTable};

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Name of the matched route.
    pub name: String,
    /// Bound `:param` and `*wildcard` values.
    pub params: HashMap<String, String>,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    /// Fragment without the leading `#`.
    pub fragment: Option<String>,
}

/// A navigation target split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

impl<'a> Location<'a> {
    pub fn parse(target: &'a str) -> Self {
        let (rest, fragment) = match target.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (target, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        Self {
            path,
            query,
            fragment,
        }
    }

    fn segments(&self) -> Vec<&'a str> {
        self.path.strip_prefix('/').unwrap_or(self.path).split('/').collect()
    }
}

/// Resolves paths against a route table.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'t> {
    table: &'t RouteTable,
}

impl<'t> Matcher<'t> {
    /// A matcher over `table`, in declaration order.
    pub fn new(table: &'t RouteTable) -> Self {
        Self { table }
    }

    /// Match a path, returning `None` for NoMatch.
    pub fn match_path(&self, target: &str) -> Option<MatchResult> {
        self.find(target).map(|(_, result)| result)
    }

    /// Like [`Matcher::match_path`] but also hands back the matched definition.
    pub fn find(&self, target: &str) -> Option<(&'t RouteDefinition, MatchResult)> {
        let location = Location::parse(target);
        if !location.path.starts_with('/') {
            return None;
        }
        let segments = location.segments();

        self.table.iter().find_map(|(definition, pattern)| {
            let params = pattern.match_segments(&segments)?;
            Some((
                definition,
                MatchResult {
                    name: definition.name.clone(),
                    params,
                    query: location.query.map(str::to_string),
                    fragment: location.fragment.map(str::to_string),
                },
            ))
        })
    }
}
