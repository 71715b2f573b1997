//! Routing of decoded payload entries to the store or to raw storage

use crate::config::MigrationConfig;
use crate::effects::RouteEffects;
use crate::errors::{DecodeError, MigrationResult};
use crate::payload::DecodedPayload;

/// Where one decoded entry goes.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageEntry {
    /// Reserved structured-store key, decoded a final time
    AddressBookImport(serde_json::Value),
    /// Persisted-state key, written verbatim
    PersistedWrite {
        /// Storage key, unchanged
        key: String,
        /// Value exactly as decoded from the payload
        value: String,
    },
    /// Key this coordinator does not migrate
    Ignored {
        /// Storage key
        key: String,
    },
}

/// Counts of what a routed payload did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteReport {
    /// Address books handed to the importer
    pub imported: usize,
    /// Raw storage writes
    pub written: usize,
    /// Keys skipped
    pub ignored: usize,
}

/// Classifies and applies payload entries by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRouter {
    address_book_key: String,
    persisted_key_prefix: String,
}

impl KeyRouter {
    /// Creates a router for the given reserved key and prefix.
    pub fn new(address_book_key: impl Into<String>, persisted_key_prefix: impl Into<String>) -> Self {
        Self {
            address_book_key: address_book_key.into(),
            persisted_key_prefix: persisted_key_prefix.into(),
        }
    }

    /// Creates a router from the migration configuration.
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self::new(&config.address_book_key, &config.persisted_key_prefix)
    }

    /// Decides where one entry goes.
    ///
    /// The address-book value is itself JSON text and is decoded here; that
    /// is the only way classification can fail.
    pub fn classify(&self, key: &str, value: &str) -> Result<StorageEntry, DecodeError> {
        if key == self.address_book_key {
            let address_book = serde_json::from_str(value).map_err(|e| DecodeError::Entry {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
            Ok(StorageEntry::AddressBookImport(address_book))
        } else if key.starts_with(&self.persisted_key_prefix) {
            Ok(StorageEntry::PersistedWrite {
                key: key.to_string(),
                value: value.to_string(),
            })
        } else {
            Ok(StorageEntry::Ignored {
                key: key.to_string(),
            })
        }
    }

    /// Classifies every entry, failing before anything has been applied.
    pub fn plan(&self, payload: &DecodedPayload) -> Result<Vec<StorageEntry>, DecodeError> {
        payload
            .iter()
            .map(|(key, value)| self.classify(key, value))
            .collect()
    }

    /// Applies planned entries in order.
    pub fn apply<E: RouteEffects + ?Sized>(
        &self,
        entries: Vec<StorageEntry>,
        effects: &mut E,
    ) -> MigrationResult<RouteReport> {
        let mut report = RouteReport::default();
        for entry in entries {
            match entry {
                StorageEntry::AddressBookImport(address_book) => {
                    effects.import_address_book(address_book)?;
                    report.imported += 1;
                }
                StorageEntry::PersistedWrite { key, value } => {
                    effects.set_item(&key, &value)?;
                    report.written += 1;
                }
                StorageEntry::Ignored { key } => {
                    tracing::trace!(key = %key, "Skipping key outside migration scope");
                    report.ignored += 1;
                }
            }
        }
        Ok(report)
    }

    /// Plans and applies a whole payload.
    pub fn route<E: RouteEffects + ?Sized>(
        &self,
        payload: &DecodedPayload,
        effects: &mut E,
    ) -> MigrationResult<RouteReport> {
        let entries = self.plan(payload)?;
        self.apply(entries, effects)
    }
}

impl Default for KeyRouter {
    fn default() -> Self {
        Self::from_config(&MigrationConfig::default())
    }
}
