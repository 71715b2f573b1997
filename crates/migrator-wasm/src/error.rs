//! Unified error handling for the browser bridge

use migrator_core::MigrationError;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Unified error type for all WASM operations
#[derive(Error, Debug)]
pub enum WasmError {
    /// Browser API unavailable (no window, document or storage).
    #[error("Browser error: {0}")]
    Browser(String),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// JavaScript interop error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// The migrator is mid-message, e.g. called from a host callback.
    #[error("Migrator is busy handling a message")]
    Busy,

    /// Migration core error.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

impl From<JsValue> for WasmError {
    fn from(js_val: JsValue) -> Self {
        let message = js_val
            .as_string()
            .unwrap_or_else(|| format!("{js_val:?}"));
        WasmError::JavaScript(message)
    }
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Render a thrown JavaScript value for error messages.
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Result type for WASM operations
pub type WasmResult<T> = Result<T, WasmError>;
