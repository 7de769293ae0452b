//! Mount point matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A mount matches its exact path or any path continuing with '/'
//! - `/inventoryfoo` does not match `/inventory`
//! - The remainder is returned untouched: no normalization or decoding

/// A path prefix that owns every path beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    prefix: String,
}

impl MountPoint {
    /// Create a new mount point. The prefix is used as given.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Returns the remainder of `path` after this mount, including its
    /// leading '/', or `None` if the path is not under this mount.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Returns true if `path` is under this mount.
    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }
}
