//! Effect interfaces for the migration coordinator
//!
//! The coordinator is pure protocol logic; everything it does to the outside
//! world goes through these traits. Browser handlers live in the wasm bridge,
//! in-memory handlers in [`crate::memory`].
//!
//! The model is single-threaded and event-driven, so handlers take `&mut self`
//! and are not required to be `Send`.

use crate::errors::{ErrorCode, MigrationResult};

/// Structured-store import collaborator (address book).
pub trait AddressBookImporter {
    /// Hand one decoded address book to the store.
    fn import_address_book(&mut self, address_book: serde_json::Value) -> MigrationResult<()>;
}

/// Raw persistent key-value storage.
pub trait PersistentStorage {
    /// Write `value` verbatim under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> MigrationResult<()>;
}

/// Hidden browsing-context control.
pub trait FrameNavigator {
    /// Load `url` into the named hidden frame, creating the frame if needed.
    fn open(&mut self, url: &str, frame_name: &str) -> MigrationResult<()>;

    /// Remove the named hidden frame if present.
    fn teardown(&mut self, frame_name: &str) -> MigrationResult<()>;
}

/// Coded error-logging collaborator.
pub trait ErrorReporter {
    /// Report one failure under `code`.
    fn log_error(&mut self, code: ErrorCode, message: &str);
}

/// Effects needed to apply a decoded payload.
pub trait RouteEffects: AddressBookImporter + PersistentStorage {}

impl<T> RouteEffects for T where T: AddressBookImporter + PersistentStorage {}

/// Everything the coordinator needs.
pub trait MigrationEffects: RouteEffects + FrameNavigator + ErrorReporter {}

impl<T> MigrationEffects for T where T: RouteEffects + FrameNavigator + ErrorReporter {}
