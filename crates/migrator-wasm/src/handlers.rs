//! Browser implementations of the migration effects

use crate::console_error;
use crate::error::{describe_js, WasmError, WasmResult};
use migrator_core::{
    AddressBookImporter, ErrorCode, ErrorReporter, FrameNavigator, MigrationError,
    MigrationResult, PersistentStorage,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlIFrameElement, Storage, Window};

/// Effect handlers backed by the page's window.
pub struct BrowserEffects {
    /// Window that owns the hidden frame and storage
    window: Window,
    /// `window.localStorage`
    storage: Storage,
    /// Element the hidden frame is appended to
    container: Element,
    /// Hidden frame, while present
    frame: Option<HtmlIFrameElement>,
    /// `(addressBook) => void` store import callback
    on_import: js_sys::Function,
    /// Optional `(code, message) => void` error callback
    on_error: Option<js_sys::Function>,
}

impl BrowserEffects {
    /// Creates handlers for `window`.
    ///
    /// Without an explicit container the frame goes into `document.body`.
    pub fn new(
        window: Window,
        container: Option<Element>,
        on_import: js_sys::Function,
        on_error: Option<js_sys::Function>,
    ) -> WasmResult<Self> {
        let storage = window
            .local_storage()?
            .ok_or_else(|| WasmError::Browser("localStorage is not available".to_string()))?;
        let container = match container {
            Some(container) => container,
            None => window
                .document()
                .and_then(|document| document.body())
                .map(Element::from)
                .ok_or_else(|| WasmError::Browser("document.body is not available".to_string()))?,
        };

        Ok(Self {
            window,
            storage,
            container,
            frame: None,
            on_import,
            on_error,
        })
    }

    fn ensure_frame(&mut self, frame_name: &str) -> MigrationResult<()> {
        if self.frame.is_some() {
            return Ok(());
        }
        let document = self
            .window
            .document()
            .ok_or_else(|| MigrationError::frame("document is not available"))?;
        let frame = document
            .create_element("iframe")
            .map_err(|e| MigrationError::frame(describe_js(&e)))?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| MigrationError::frame("created element is not an iframe"))?;
        frame.set_name(frame_name);
        frame.set_id(frame_name);
        frame.set_hidden(true);
        self.container
            .append_child(&frame)
            .map_err(|e| MigrationError::frame(describe_js(&e)))?;
        self.frame = Some(frame);
        Ok(())
    }
}

impl AddressBookImporter for BrowserEffects {
    fn import_address_book(&mut self, address_book: serde_json::Value) -> MigrationResult<()> {
        let value = js_sys::JSON::parse(&address_book.to_string())
            .map_err(|e| MigrationError::import(describe_js(&e)))?;
        self.on_import
            .call1(&JsValue::NULL, &value)
            .map_err(|e| MigrationError::import(describe_js(&e)))?;
        Ok(())
    }
}

impl PersistentStorage for BrowserEffects {
    fn set_item(&mut self, key: &str, value: &str) -> MigrationResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| MigrationError::storage(describe_js(&e)))
    }
}

impl FrameNavigator for BrowserEffects {
    fn open(&mut self, url: &str, frame_name: &str) -> MigrationResult<()> {
        self.ensure_frame(frame_name)?;
        self.window
            .open_with_url_and_target(url, frame_name)
            .map_err(|e| MigrationError::frame(describe_js(&e)))?;
        Ok(())
    }

    fn teardown(&mut self, _frame_name: &str) -> MigrationResult<()> {
        if let Some(frame) = self.frame.take() {
            frame.remove();
        }
        Ok(())
    }
}

impl ErrorReporter for BrowserEffects {
    fn log_error(&mut self, code: ErrorCode, message: &str) {
        let reported = match &self.on_error {
            Some(callback) => callback
                .call2(
                    &JsValue::NULL,
                    &JsValue::from_str(code.as_str()),
                    &JsValue::from_str(message),
                )
                .is_ok(),
            None => false,
        };
        if !reported {
            console_error!("{code}: {message}");
        }
    }
}
