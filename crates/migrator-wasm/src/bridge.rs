//! JavaScript-facing migrator
//!
//! Host callbacks (`on_import`, `on_error`) run while the migrator is
//! mutably borrowed by the message listener. Read accessors therefore serve a
//! [`StatusReader`] snapshot kept outside that borrow, and mutating calls
//! made from inside a callback fail with [`WasmError::Busy`] instead of
//! panicking.

use crate::error::{WasmError, WasmResult};
use crate::handlers::BrowserEffects;
use crate::listener::subscribe_messages;
use migrator_core::{MessageOutcome, MigrationConfig, MigrationState, StoreMigrator, Subscription};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type SharedMigrator = Rc<RefCell<StoreMigrator<BrowserEffects>>>;

/// Point-in-time view of a migrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorStatus {
    /// Current state
    pub state: MigrationState,
    /// Migration index in `[0, N]`
    pub progress: usize,
    /// URL the hidden frame should show
    pub current_url: Option<String>,
}

impl MigratorStatus {
    fn capture<E>(migrator: &StoreMigrator<E>) -> Self {
        Self {
            state: migrator.state(),
            progress: migrator.progress(),
            current_url: migrator.current_url(),
        }
    }
}

/// Cloneable read handle on a migrator's status.
///
/// Never touches the migrator itself, so it is safe to use from host
/// callbacks.
#[derive(Debug, Clone)]
pub struct StatusReader {
    status: Rc<RefCell<MigratorStatus>>,
}

impl StatusReader {
    /// Latest status.
    pub fn status(&self) -> MigratorStatus {
        self.status.borrow().clone()
    }

    /// Latest state.
    pub fn state(&self) -> MigrationState {
        self.status.borrow().state
    }

    fn refresh<E>(&self, migrator: &StoreMigrator<E>) {
        *self.status.borrow_mut() = MigratorStatus::capture(migrator);
    }
}

/// Store migrator bound to the current window.
///
/// `activate()` on mount, `deactivate()` on unmount; the message listener is
/// registered only in between.
#[wasm_bindgen]
pub struct StoreMigratorJs {
    /// Shared with the message listener.
    migrator: SharedMigrator,
    /// Status snapshot, refreshed after every mutation.
    reader: StatusReader,
    /// Active listener registration.
    subscription: Option<Subscription>,
}

#[wasm_bindgen]
impl StoreMigratorJs {
    /// Creates a migrator.
    ///
    /// - `config_json`: partial `MigrationConfig` JSON, defaults when absent
    /// - `on_import`: called with each decoded address book
    /// - `on_error`: called as `(code, message)`; console when absent
    /// - `container`: parent of the hidden frame; `document.body` when absent
    /// - `own_origin`: `window.origin` when absent
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        on_import: js_sys::Function,
        on_error: Option<js_sys::Function>,
        container: Option<web_sys::Element>,
        own_origin: Option<String>,
    ) -> WasmResult<StoreMigratorJs> {
        let config = match config_json {
            Some(json) => MigrationConfig::from_json(&json)?,
            None => MigrationConfig::default(),
        };
        let window = web_sys::window()
            .ok_or_else(|| WasmError::Browser("window is not available".to_string()))?;
        let own_origin = own_origin.unwrap_or_else(|| window.origin());
        let effects = BrowserEffects::new(window, container, on_import, on_error)?;
        let migrator = StoreMigrator::new(config, own_origin, effects)?;
        let reader = StatusReader {
            status: Rc::new(RefCell::new(MigratorStatus::capture(&migrator))),
        };

        Ok(StoreMigratorJs {
            migrator: Rc::new(RefCell::new(migrator)),
            reader,
            subscription: None,
        })
    }

    /// Subscribes to messages and loads the current target.
    pub fn activate(&mut self) -> WasmResult<()> {
        if self.subscription.is_none() {
            let window = web_sys::window()
                .ok_or_else(|| WasmError::Browser("window is not available".to_string()))?;
            let migrator = self.migrator.clone();
            let reader = self.reader.clone();
            let subscription = subscribe_messages(&window, move |event| {
                let Ok(mut migrator) = migrator.try_borrow_mut() else {
                    tracing::warn!(origin = %event.origin, "Migrator busy, dropping message");
                    return;
                };
                let outcome = migrator.handle_message(&event);
                reader.refresh(&*migrator);
                match outcome {
                    MessageOutcome::Advanced { state, .. } => {
                        tracing::debug!(state = %state, "Migration advanced");
                    }
                    MessageOutcome::Rejected(code) => {
                        tracing::debug!(code = code.as_str(), "Migration payload rejected");
                    }
                    MessageOutcome::Untrusted | MessageOutcome::Stale => {}
                }
            })?;
            self.subscription = Some(subscription);
        }
        let mut migrator = self.migrator.try_borrow_mut().map_err(|_| WasmError::Busy)?;
        let activated = migrator.activate();
        self.reader.refresh(&*migrator);
        activated?;
        Ok(())
    }

    /// Releases the listener and removes the hidden frame.
    pub fn deactivate(&mut self) -> WasmResult<()> {
        let mut migrator = self.migrator.try_borrow_mut().map_err(|_| WasmError::Busy)?;
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
        let deactivated = migrator.deactivate();
        self.reader.refresh(&*migrator);
        deactivated?;
        Ok(())
    }

    /// `"migrating:<i>"` or `"complete"`.
    pub fn state(&self) -> String {
        self.reader.state().to_string()
    }

    /// Migration index; equals the target count once complete.
    pub fn progress(&self) -> usize {
        self.reader.status().progress
    }

    /// Whether the migration has finished.
    pub fn is_complete(&self) -> bool {
        self.reader.state().is_complete()
    }

    /// Whether the message listener is registered.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// URL the hidden frame should currently show.
    pub fn current_url(&self) -> Option<String> {
        self.reader.status().current_url
    }
}

impl StoreMigratorJs {
    /// Read handle usable from inside host callbacks.
    pub fn status_reader(&self) -> StatusReader {
        self.reader.clone()
    }
}

impl Drop for StoreMigratorJs {
    fn drop(&mut self) {
        self.subscription.take();
        if let Ok(mut migrator) = self.migrator.try_borrow_mut() {
            if migrator.deactivate().is_err() {
                tracing::debug!("Frame teardown failed while dropping migrator");
            }
        }
    }
}
