//! Migration configuration
//!
//! The coordinator never reads ambient state: the allowlist, the primary
//! origin and the reserved storage names all arrive through this value.

use crate::errors::{MigrationError, MigrationResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default trusted target base URLs, in visit order.
pub const DEFAULT_TARGETS: [&str; 2] = ["http://localhost:3001/#", "http://localhost:3002/#"];

/// Default origin of the primary (coordinating) application.
pub const DEFAULT_PRIMARY_ORIGIN: &str = "http://localhost:3000";

/// Route appended to a target base URL to reach its migration page.
pub const DEFAULT_MIGRATION_ROUTE: &str = "/migrate";

/// Name of the single hidden browsing context.
pub const DEFAULT_FRAME_NAME: &str = "targetWindow";

/// Payload key routed to the address-book importer.
pub const ADDRESS_BOOK_KEY: &str = "SAFE__addressBook";

/// Prefix of keys written verbatim into persistent storage.
pub const PERSISTED_KEY_PREFIX: &str = "_immortal|v2_";

/// Complete configuration of one migration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationConfig {
    /// Trusted target base URLs, visited in order
    pub targets: Vec<String>,
    /// Origin that acts as migration source; never treated as a target
    pub primary_origin: String,
    /// Path appended to each base URL
    pub migration_route_path: String,
    /// Name of the hidden frame
    pub frame_name: String,
    /// Reserved structured-store key
    pub address_book_key: String,
    /// Reserved persisted-state key prefix
    pub persisted_key_prefix: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            targets: DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect(),
            primary_origin: DEFAULT_PRIMARY_ORIGIN.to_string(),
            migration_route_path: DEFAULT_MIGRATION_ROUTE.to_string(),
            frame_name: DEFAULT_FRAME_NAME.to_string(),
            address_book_key: ADDRESS_BOOK_KEY.to_string(),
            persisted_key_prefix: PERSISTED_KEY_PREFIX.to_string(),
        }
    }
}

impl MigrationConfig {
    /// Parse a (possibly partial) JSON object over the defaults and validate it.
    pub fn from_json(json: &str) -> MigrationResult<Self> {
        let config: MigrationConfig = serde_json::from_str(json)
            .map_err(|e| MigrationError::config(format!("Invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the target list.
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the primary origin.
    pub fn with_primary_origin(mut self, origin: impl Into<String>) -> Self {
        self.primary_origin = origin.into();
        self
    }

    /// Check the configuration for values the coordinator cannot work with.
    ///
    /// An empty target list is valid: the migration is complete immediately.
    pub fn validate(&self) -> MigrationResult<()> {
        let mut seen = HashSet::new();
        for (index, target) in self.targets.iter().enumerate() {
            if target.trim().is_empty() {
                return Err(MigrationError::config(format!(
                    "Field 'targets[{index}]' is required but empty"
                )));
            }
            if !seen.insert(target.as_str()) {
                return Err(MigrationError::config(format!(
                    "Field 'targets[{index}]' duplicates '{target}'"
                )));
            }
        }
        for (field, value) in [
            ("frame_name", &self.frame_name),
            ("address_book_key", &self.address_book_key),
            ("persisted_key_prefix", &self.persisted_key_prefix),
        ] {
            if value.is_empty() {
                return Err(MigrationError::config(format!(
                    "Field '{field}' is required but empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_validate() {
        let config = MigrationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.frame_name, "targetWindow");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            MigrationConfig::from_json(r#"{"targets": ["https://a.example/#"]}"#).unwrap();
        assert_eq!(config.targets, vec!["https://a.example/#".to_string()]);
        assert_eq!(config.primary_origin, DEFAULT_PRIMARY_ORIGIN);
        assert_eq!(config.migration_route_path, DEFAULT_MIGRATION_ROUTE);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = MigrationConfig::from_json(r#"{"target": []}"#).unwrap_err();
        assert_matches!(err, MigrationError::Config(_));
    }

    #[test]
    fn duplicate_targets_are_rejected() {
        let config = MigrationConfig::default().with_targets(["http://x/#", "http://x/#"]);
        assert_matches!(config.validate(), Err(MigrationError::Config(msg)) if msg.contains("targets[1]"));
    }

    #[test]
    fn empty_frame_name_is_rejected() {
        let mut config = MigrationConfig::default();
        config.frame_name.clear();
        assert_matches!(config.validate(), Err(MigrationError::Config(_)));
    }

    #[test]
    fn empty_target_list_is_valid() {
        let config = MigrationConfig::default().with_targets(Vec::<String>::new());
        assert!(config.validate().is_ok());
    }
}
