//! Ordered allowlist of trusted target origins

use serde::{Deserialize, Serialize};

/// One trusted peer application whose local state is migrated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetOrigin {
    /// Base URL including any fragment suffix, e.g. `http://localhost:3001/#`
    pub base_url: String,
}

impl TargetOrigin {
    /// Creates a target from its base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Whether `origin` names this target.
    ///
    /// Containment, not equality: the base URL carries a path/fragment suffix
    /// that a browser origin never has.
    pub fn matches(&self, origin: &str) -> bool {
        !origin.is_empty() && self.base_url.contains(origin)
    }

    /// URL of this target's migration page.
    pub fn migration_url(&self, route_path: &str) -> String {
        format!("{}{}", self.base_url, route_path)
    }
}

/// Immutable, ordered list of trusted targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginAllowlist {
    targets: Vec<TargetOrigin>,
}

impl OriginAllowlist {
    /// Builds the allowlist in visit order.
    pub fn new(targets: Vec<TargetOrigin>) -> Self {
        Self { targets }
    }

    /// Builds the allowlist from base URL strings.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(urls.into_iter().map(TargetOrigin::new).collect())
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when there is nothing to migrate.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&TargetOrigin> {
        self.targets.get(index)
    }

    /// Iterates targets in visit order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetOrigin> {
        self.targets.iter()
    }

    /// Whether any target matches `origin`.
    pub fn is_trusted(&self, origin: &str) -> bool {
        self.targets.iter().any(|t| t.matches(origin))
    }

    /// Index of the first target matching `origin`.
    pub fn position_of(&self, origin: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.matches(origin))
    }
}
