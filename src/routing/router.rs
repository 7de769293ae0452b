//! Dispatch table: ordered mount point → backend lookup.
//!
//! # Responsibilities
//! - Store compiled rules in definition order
//! - Resolve a path to exactly one backend plus the remainder path
//! - Return an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan, first registered match wins
//! - Explicit NoMatch rather than silent default

use crate::config::RouteConfig;
use crate::routing::matcher::MountPoint;

/// One compiled route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRule {
    name: String,
    mount: MountPoint,
    backend_url: String,
}

impl DispatchRule {
    /// Create a rule. A trailing '/' on the backend URL is trimmed so that
    /// concatenating the remainder never doubles the separator.
    pub fn new(
        name: impl Into<String>,
        mount: impl Into<String>,
        backend_url: impl Into<String>,
    ) -> Self {
        let backend_url = backend_url.into();
        let backend_url = backend_url.trim_end_matches('/').to_string();
        Self {
            name: name.into(),
            mount: MountPoint::new(mount),
            backend_url,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }
}

impl From<&RouteConfig> for DispatchRule {
    fn from(config: &RouteConfig) -> Self {
        Self::new(&config.name, &config.mount, &config.backend_url)
    }
}

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub rule: &'a DispatchRule,
    /// Path after the mount point, including its leading '/'. May be empty.
    pub remainder: &'a str,
}

impl Resolved<'_> {
    pub fn backend_url(&self) -> &str {
        self.rule.backend_url()
    }

    pub fn route(&self) -> &str {
        self.rule.name()
    }
}

/// Immutable, ordered set of dispatch rules.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    rules: Vec<DispatchRule>,
}

impl DispatchTable {
    pub fn new(rules: Vec<DispatchRule>) -> Self {
        Self { rules }
    }

    /// Compile routes from configuration, keeping their order.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        Self::new(routes.iter().map(DispatchRule::from).collect())
    }

    /// Resolve `path` to a backend. First registered match wins.
    pub fn resolve<'a>(&'a self, path: &'a str) -> Option<Resolved<'a>> {
        self.rules.iter().find_map(|rule| {
            rule.mount
                .strip(path)
                .map(|remainder| Resolved { rule, remainder })
        })
    }

    pub fn rules(&self) -> &[DispatchRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
