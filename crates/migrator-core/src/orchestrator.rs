//! Hidden-frame orchestration
//!
//! Exactly one named frame slot exists. Each time the state changes the
//! orchestrator loads the addressed target's migration page into it; once
//! the migration is complete the slot is torn down.

use crate::allowlist::OriginAllowlist;
use crate::config::MigrationConfig;
use crate::effects::FrameNavigator;
use crate::errors::MigrationResult;
use crate::state::MigrationState;

/// Drives the hidden frame from the migration state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOrchestrator {
    route_path: String,
    frame_name: String,
    frame_open: bool,
}

impl FrameOrchestrator {
    /// Creates an orchestrator for the given route and frame name.
    pub fn new(route_path: impl Into<String>, frame_name: impl Into<String>) -> Self {
        Self {
            route_path: route_path.into(),
            frame_name: frame_name.into(),
            frame_open: false,
        }
    }

    /// Creates an orchestrator from the migration configuration.
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self::new(&config.migration_route_path, &config.frame_name)
    }

    /// Name of the hidden frame.
    pub fn frame_name(&self) -> &str {
        &self.frame_name
    }

    /// Whether the frame has been opened and not torn down.
    pub fn is_frame_open(&self) -> bool {
        self.frame_open
    }

    /// Migration URL for `state`, if it addresses a target.
    pub fn target_url(&self, state: MigrationState, allowlist: &OriginAllowlist) -> Option<String> {
        state
            .index()
            .and_then(|index| allowlist.get(index))
            .map(|target| target.migration_url(&self.route_path))
    }

    /// Bring the frame in line with `state`.
    ///
    /// Returns the URL loaded, if any.
    pub fn sync<N: FrameNavigator + ?Sized>(
        &mut self,
        state: MigrationState,
        allowlist: &OriginAllowlist,
        navigator: &mut N,
    ) -> MigrationResult<Option<String>> {
        match self.target_url(state, allowlist) {
            Some(url) => {
                tracing::debug!(url = %url, frame = %self.frame_name, "Loading migration target");
                navigator.open(&url, &self.frame_name)?;
                self.frame_open = true;
                Ok(Some(url))
            }
            None => {
                self.close(navigator)?;
                Ok(None)
            }
        }
    }

    /// Tear the frame down if it is open.
    pub fn close<N: FrameNavigator + ?Sized>(&mut self, navigator: &mut N) -> MigrationResult<()> {
        if self.frame_open {
            navigator.teardown(&self.frame_name)?;
            self.frame_open = false;
        }
        Ok(())
    }
}
