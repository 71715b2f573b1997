//! # Store Migrator Core
//!
//! **Purpose**: Sequential cross-origin migration of client-side state.
//!
//! A coordinator on the source origin visits a fixed, ordered list of target
//! origins. Each target is loaded into one hidden, named frame and posts a
//! snapshot of its local state back as a cross-document message. The
//! coordinator validates the sender, decodes the two-layer payload, routes
//! each entry to the address-book importer or to raw persistent storage, and
//! moves on to the next target.
//!
//! ## Core Concepts
//!
//! - **Allowlist**: immutable ordered trusted targets ([`OriginAllowlist`])
//! - **Validator**: provenance check for inbound messages
//! - **Payload**: two-layer JSON wire format ([`payload::decode`])
//! - **Router**: reserved key and prefix dispatch ([`KeyRouter`])
//! - **State machine**: `Migrating(i) | Complete` ([`MigrationState`])
//! - **Orchestrator**: hidden frame lifecycle ([`FrameOrchestrator`])
//!
//! ## What's NOT in this crate
//!
//! - Browser handlers (belong in `store-migrator-wasm`)
//! - Retries, timeouts or resumption after reload

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Ordered allowlist of trusted target origins
pub mod allowlist;

/// Migration configuration and reserved names
pub mod config;

/// Message-handling coordinator
pub mod coordinator;

/// Effect traits for the outside world
pub mod effects;

/// Unified error types and error codes
pub mod errors;

/// In-memory effect handlers
pub mod memory;

/// Inbound message envelope
pub mod message;

/// Hidden-frame orchestration
pub mod orchestrator;

/// Two-layer payload wire format
pub mod payload;

/// Key routing to store or storage
pub mod router;

/// Migration state machine
pub mod state;

/// Scoped listener registration
pub mod subscription;

/// Message provenance validation
pub mod validator;

pub use allowlist::{OriginAllowlist, TargetOrigin};
pub use config::MigrationConfig;
pub use coordinator::{MessageOutcome, StoreMigrator};
pub use effects::{
    AddressBookImporter, ErrorReporter, FrameNavigator, MigrationEffects, PersistentStorage,
    RouteEffects,
};
pub use errors::{CodedError, DecodeError, ErrorCode, MigrationError, MigrationResult};
pub use message::{InboundMessageEvent, MigrationEnvelope};
pub use orchestrator::FrameOrchestrator;
pub use payload::DecodedPayload;
pub use router::{KeyRouter, RouteReport, StorageEntry};
pub use state::{MigrationEvent, MigrationState};
pub use subscription::Subscription;
pub use validator::is_acceptable_migration_message;
