//! In-memory effect handlers
//!
//! Used by tests and by hosts that run the coordinator outside a browser.
//! Every call is recorded so callers can assert on exact side effects.

use crate::effects::{AddressBookImporter, ErrorReporter, FrameNavigator, PersistentStorage};
use crate::errors::{ErrorCode, MigrationError, MigrationResult};
use std::collections::BTreeMap;

/// A frame operation observed by [`MemoryEffects`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameCall {
    /// `open(url, frame_name)`
    Open {
        /// Loaded URL
        url: String,
        /// Frame name
        frame_name: String,
    },
    /// `teardown(frame_name)`
    Teardown {
        /// Frame name
        frame_name: String,
    },
}

/// Recording implementation of every migration effect.
#[derive(Debug, Default)]
pub struct MemoryEffects {
    /// Persistent key-value storage contents
    pub storage: BTreeMap<String, String>,
    /// Address books passed to the importer, in call order
    pub imports: Vec<serde_json::Value>,
    /// Frame operations, in call order
    pub frame_calls: Vec<FrameCall>,
    /// URL currently loaded in the hidden frame
    pub loaded_url: Option<String>,
    /// Reported errors, in call order
    pub errors: Vec<(ErrorCode, String)>,
    /// When set, every storage write fails
    pub fail_writes: bool,
    /// When set, every address-book import fails
    pub fail_imports: bool,
    /// When set, every frame operation fails
    pub fail_frames: bool,
}

impl MemoryEffects {
    /// Creates empty handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs passed to `open`, in call order.
    pub fn opened_urls(&self) -> Vec<&str> {
        self.frame_calls
            .iter()
            .filter_map(|call| match call {
                FrameCall::Open { url, .. } => Some(url.as_str()),
                FrameCall::Teardown { .. } => None,
            })
            .collect()
    }
}

impl AddressBookImporter for MemoryEffects {
    fn import_address_book(&mut self, address_book: serde_json::Value) -> MigrationResult<()> {
        if self.fail_imports {
            return Err(MigrationError::import("importer rejected address book"));
        }
        self.imports.push(address_book);
        Ok(())
    }
}

impl PersistentStorage for MemoryEffects {
    fn set_item(&mut self, key: &str, value: &str) -> MigrationResult<()> {
        if self.fail_writes {
            return Err(MigrationError::storage(format!("quota exceeded writing {key}")));
        }
        self.storage.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl FrameNavigator for MemoryEffects {
    fn open(&mut self, url: &str, frame_name: &str) -> MigrationResult<()> {
        if self.fail_frames {
            return Err(MigrationError::frame(format!("cannot load {url}")));
        }
        self.frame_calls.push(FrameCall::Open {
            url: url.to_string(),
            frame_name: frame_name.to_string(),
        });
        self.loaded_url = Some(url.to_string());
        Ok(())
    }

    fn teardown(&mut self, frame_name: &str) -> MigrationResult<()> {
        if self.fail_frames {
            return Err(MigrationError::frame(format!("cannot remove {frame_name}")));
        }
        self.frame_calls.push(FrameCall::Teardown {
            frame_name: frame_name.to_string(),
        });
        self.loaded_url = None;
        Ok(())
    }
}

impl ErrorReporter for MemoryEffects {
    fn log_error(&mut self, code: ErrorCode, message: &str) {
        self.errors.push((code, message.to_string()));
    }
}
