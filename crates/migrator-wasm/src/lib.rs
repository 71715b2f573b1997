//! # Store Migrator WASM
//!
//! Browser bridge for `store-migrator-core`: localStorage writes, the hidden
//! `<iframe>`, the window `message` listener and the JavaScript export.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod logging;

/// Browser effect handlers
pub mod handlers;

/// Window message listener
pub mod listener;

/// JavaScript export
pub mod bridge;

pub use bridge::StoreMigratorJs;
pub use error::{WasmError, WasmResult};
pub use handlers::BrowserEffects;

use wasm_bindgen::prelude::*;

/// Initialize panic reporting and console logging.
///
/// `filter` takes `EnvFilter` directives and defaults to `"info"`.
#[wasm_bindgen]
pub fn init(filter: Option<String>) {
    logging::init_logging(filter.as_deref().unwrap_or("info"));
}
