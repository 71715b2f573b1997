//! Unified error types for the store migrator
//!
//! Every failure that reaches the error-logging collaborator carries an
//! [`ErrorCode`]. Untrusted messages are not errors; they never get here.

use thiserror::Error;

/// Coded errors understood by the host's error-reporting facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A migration payload could not be decoded or applied.
    MigrationFailed,
}

impl ErrorCode {
    /// Numeric code as reported to the host.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MigrationFailed => "612",
        }
    }

    /// Human-readable description attached to the code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MigrationFailed => "Error migrating HTML5 local storage",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.as_str(), self.description())
    }
}

/// Maps an error onto the code it is reported under.
pub trait CodedError {
    /// The code this error is logged with.
    fn code(&self) -> ErrorCode;
}

/// Failure to decode the two-layer migration payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The outer payload is not a JSON object of string values.
    #[error("invalid payload envelope: {0}")]
    Envelope(String),

    /// One entry's inner value is not valid JSON.
    #[error("invalid payload entry '{key}': {reason}")]
    Entry {
        /// Storage key of the offending entry
        key: String,
        /// Parser message
        reason: String,
    },
}

impl CodedError for DecodeError {
    fn code(&self) -> ErrorCode {
        ErrorCode::MigrationFailed
    }
}

/// Errors raised while running a migration.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Payload decoding failed; nothing was applied.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The address-book importer refused the entry.
    #[error("Import error: {0}")]
    Import(String),

    /// Persistent storage rejected a write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The migration configuration is unusable.
    #[error("Config error: {0}")]
    Config(String),

    /// The hidden frame could not be opened or removed.
    #[error("Frame error: {0}")]
    Frame(String),
}

impl MigrationError {
    /// Create an import error
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a frame error
    pub fn frame(message: impl Into<String>) -> Self {
        Self::Frame(message.into())
    }
}

impl CodedError for MigrationError {
    fn code(&self) -> ErrorCode {
        match self {
            MigrationError::Decode(err) => err.code(),
            MigrationError::Import(_)
            | MigrationError::Storage(_)
            | MigrationError::Config(_)
            | MigrationError::Frame(_) => ErrorCode::MigrationFailed,
        }
    }
}

/// Result type for migration operations
pub type MigrationResult<T> = Result<T, MigrationError>;
