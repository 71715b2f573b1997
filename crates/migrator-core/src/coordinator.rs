//! Migration coordinator
//!
//! Glues the validator, decoder, router, state machine and frame orchestrator
//! together around a single message-handling path. That path is the only
//! place the migration state is mutated.
//!
//! ## Flow
//! 1. `activate()` loads target 0 into the hidden frame
//! 2. The target posts `{ migrate: true, payload }` back
//! 3. `handle_message()` validates, decodes and routes the payload
//! 4. The state advances and the next target is loaded
//! 5. After the last target the frame is torn down

use crate::allowlist::{OriginAllowlist, TargetOrigin};
use crate::config::MigrationConfig;
use crate::effects::MigrationEffects;
use crate::errors::{CodedError, ErrorCode, MigrationResult};
use crate::message::InboundMessageEvent;
use crate::orchestrator::FrameOrchestrator;
use crate::payload;
use crate::router::{KeyRouter, RouteReport};
use crate::state::{is_single_network_app, transition, MigrationEvent, MigrationState};
use crate::validator::is_acceptable_migration_message;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Not a migration message from a trusted, distinct origin; dropped silently
    Untrusted,
    /// Trusted, but not from the currently addressed target
    Stale,
    /// Decoding or applying failed; reported under the code, state unchanged
    Rejected(ErrorCode),
    /// Applied; the migration moved on
    Advanced {
        /// State after the transition
        state: MigrationState,
        /// What the payload did
        report: RouteReport,
    },
}

/// Sequential cross-origin store migrator.
pub struct StoreMigrator<E> {
    own_origin: String,
    allowlist: OriginAllowlist,
    router: KeyRouter,
    orchestrator: FrameOrchestrator,
    single_network: bool,
    state: MigrationState,
    effects: E,
}

impl<E: MigrationEffects> StoreMigrator<E> {
    /// Creates a coordinator running on `own_origin`.
    pub fn new(
        config: MigrationConfig,
        own_origin: impl Into<String>,
        effects: E,
    ) -> MigrationResult<Self> {
        config.validate()?;
        let own_origin = own_origin.into();
        let allowlist = OriginAllowlist::from_urls(config.targets.iter().cloned());
        let single_network =
            is_single_network_app(&own_origin, &config.primary_origin, &allowlist);

        let mut state = MigrationState::initial(allowlist.len());
        if single_network {
            tracing::info!(origin = %own_origin, "Origin is a migration target, nothing to migrate");
            state = transition(state, MigrationEvent::SelfIsTarget, allowlist.len());
        }

        Ok(Self {
            router: KeyRouter::from_config(&config),
            orchestrator: FrameOrchestrator::from_config(&config),
            own_origin,
            allowlist,
            single_network,
            state,
            effects,
        })
    }

    /// Loads the frame for the current state.
    pub fn activate(&mut self) -> MigrationResult<()> {
        let synced = self
            .orchestrator
            .sync(self.state, &self.allowlist, &mut self.effects);
        self.report_failure(synced.map(|_| ()))
    }

    /// Tears the hidden frame down.
    pub fn deactivate(&mut self) -> MigrationResult<()> {
        let closed = self.orchestrator.close(&mut self.effects);
        self.report_failure(closed)
    }

    /// Handles one inbound message event.
    pub fn handle_message(&mut self, event: &InboundMessageEvent) -> MessageOutcome {
        if !is_acceptable_migration_message(event, &self.own_origin, &self.allowlist) {
            tracing::debug!(origin = %event.origin, "Dropping untrusted message");
            return MessageOutcome::Untrusted;
        }

        let origin_index = match self.state.index() {
            Some(index)
                if self
                    .allowlist
                    .get(index)
                    .is_some_and(|target| target.matches(&event.origin)) =>
            {
                index
            }
            _ => {
                tracing::debug!(
                    origin = %event.origin,
                    state = %self.state,
                    "Ignoring message from target that is not being migrated"
                );
                return MessageOutcome::Stale;
            }
        };

        let report = match self.apply_payload(&event.data.payload) {
            Ok(report) => report,
            Err(err) => {
                let code = err.code();
                tracing::warn!(origin = %event.origin, error = %err, "Migration payload rejected");
                self.effects.log_error(code, &err.to_string());
                self.state = transition(
                    self.state,
                    MigrationEvent::PayloadRejected,
                    self.allowlist.len(),
                );
                return MessageOutcome::Rejected(code);
            }
        };

        self.state = transition(
            self.state,
            MigrationEvent::PayloadApplied { origin_index },
            self.allowlist.len(),
        );
        tracing::info!(
            origin = %event.origin,
            imported = report.imported,
            written = report.written,
            ignored = report.ignored,
            state = %self.state,
            "Migrated target"
        );

        // The payload is already applied; a frame failure is reported but
        // does not undo the transition.
        if self.activate().is_err() {
            tracing::debug!(state = %self.state, "Keeping transition after frame failure");
        }

        MessageOutcome::Advanced {
            state: self.state,
            report,
        }
    }

    fn apply_payload(&mut self, raw: &str) -> MigrationResult<RouteReport> {
        let decoded = payload::decode(raw)?;
        self.router.route(&decoded, &mut self.effects)
    }

    fn report_failure(&mut self, result: MigrationResult<()>) -> MigrationResult<()> {
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Frame orchestration failed");
            self.effects.log_error(err.code(), &err.to_string());
        }
        result
    }
}

impl<E> StoreMigrator<E> {
    /// Current state.
    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Migration index in `[0, N]`.
    pub fn progress(&self) -> usize {
        self.state.progress(self.allowlist.len())
    }

    /// Origin this coordinator runs on.
    pub fn own_origin(&self) -> &str {
        &self.own_origin
    }

    /// Trusted targets in visit order.
    pub fn allowlist(&self) -> &OriginAllowlist {
        &self.allowlist
    }

    /// Whether this coordinator runs on one of its own targets.
    pub fn is_single_network_app(&self) -> bool {
        self.single_network
    }

    /// Target currently being migrated.
    pub fn current_target(&self) -> Option<&TargetOrigin> {
        self.state.index().and_then(|index| self.allowlist.get(index))
    }

    /// URL currently expected in the hidden frame.
    pub fn current_url(&self) -> Option<String> {
        self.orchestrator.target_url(self.state, &self.allowlist)
    }

    /// Whether the hidden frame is present.
    pub fn is_frame_open(&self) -> bool {
        self.orchestrator.is_frame_open()
    }

    /// Effect handlers.
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Mutable effect handlers.
    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    /// Consumes the coordinator, returning its effect handlers.
    pub fn into_effects(self) -> E {
        self.effects
    }
}

impl<E> std::fmt::Debug for StoreMigrator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreMigrator")
            .field("own_origin", &self.own_origin)
            .field("targets", &self.allowlist.len())
            .field("state", &self.state)
            .field("single_network", &self.single_network)
            .finish()
    }
}
