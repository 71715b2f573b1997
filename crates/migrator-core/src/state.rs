//! Migration state machine
//!
//! `Migrating(i)` addresses target `i`; `Complete` is absorbing. The index
//! only moves forward, one step per payload applied from the currently
//! addressed target. Transitions are pure and independent of messaging.

use crate::allowlist::OriginAllowlist;

/// Where the migration stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationState {
    /// Waiting for the payload of target `index`
    Migrating(usize),
    /// Every target done, or nothing to do on this origin
    Complete,
}

impl MigrationState {
    /// Initial state for `target_count` targets.
    pub fn initial(target_count: usize) -> Self {
        if target_count == 0 {
            MigrationState::Complete
        } else {
            MigrationState::Migrating(0)
        }
    }

    /// Index of the addressed target, if still migrating.
    pub fn index(&self) -> Option<usize> {
        match self {
            MigrationState::Migrating(index) => Some(*index),
            MigrationState::Complete => None,
        }
    }

    /// Whether no further transitions can happen.
    pub fn is_complete(&self) -> bool {
        matches!(self, MigrationState::Complete)
    }

    /// Migration index in `[0, N]`, with `N` meaning complete.
    pub fn progress(&self, target_count: usize) -> usize {
        self.index().unwrap_or(target_count)
    }
}

impl std::fmt::Display for MigrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationState::Migrating(index) => write!(f, "migrating:{index}"),
            MigrationState::Complete => write!(f, "complete"),
        }
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationEvent {
    /// A payload from target `origin_index` was decoded and applied
    PayloadApplied {
        /// Allowlist position of the sender
        origin_index: usize,
    },
    /// A payload failed to decode or apply
    PayloadRejected,
    /// The coordinator itself is one of the targets
    SelfIsTarget,
}

/// Pure transition function.
pub fn transition(
    state: MigrationState,
    event: MigrationEvent,
    target_count: usize,
) -> MigrationState {
    match (state, event) {
        (_, MigrationEvent::SelfIsTarget) => MigrationState::Complete,
        (MigrationState::Complete, _) => MigrationState::Complete,
        (MigrationState::Migrating(index), MigrationEvent::PayloadApplied { origin_index })
            if origin_index == index =>
        {
            let next = index + 1;
            if next >= target_count {
                MigrationState::Complete
            } else {
                MigrationState::Migrating(next)
            }
        }
        (state, _) => state,
    }
}

/// Whether the coordinator runs on one of its own targets.
///
/// Computed once per coordinator; the own origin does not change during its
/// lifetime.
pub fn is_single_network_app(
    own_origin: &str,
    primary_origin: &str,
    allowlist: &OriginAllowlist,
) -> bool {
    own_origin != primary_origin && allowlist.is_trusted(own_origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_first_target() {
        assert_eq!(MigrationState::initial(2), MigrationState::Migrating(0));
        assert_eq!(MigrationState::initial(0), MigrationState::Complete);
    }

    #[test]
    fn advances_on_current_target_only() {
        let state = MigrationState::Migrating(1);
        assert_eq!(
            transition(state, MigrationEvent::PayloadApplied { origin_index: 0 }, 3),
            state
        );
        assert_eq!(
            transition(state, MigrationEvent::PayloadApplied { origin_index: 2 }, 3),
            state
        );
        assert_eq!(
            transition(state, MigrationEvent::PayloadApplied { origin_index: 1 }, 3),
            MigrationState::Migrating(2)
        );
    }

    #[test]
    fn last_target_completes() {
        assert_eq!(
            transition(
                MigrationState::Migrating(1),
                MigrationEvent::PayloadApplied { origin_index: 1 },
                2
            ),
            MigrationState::Complete
        );
    }

    #[test]
    fn rejection_keeps_state() {
        let state = MigrationState::Migrating(0);
        assert_eq!(transition(state, MigrationEvent::PayloadRejected, 2), state);
    }

    #[test]
    fn self_target_short_circuits() {
        assert_eq!(
            transition(MigrationState::Migrating(0), MigrationEvent::SelfIsTarget, 2),
            MigrationState::Complete
        );
    }

    #[test]
    fn single_network_detection() {
        let list = OriginAllowlist::from_urls(["http://localhost:3001/#", "http://localhost:3002/#"]);
        assert!(is_single_network_app("http://localhost:3001", "http://localhost:3000", &list));
        assert!(!is_single_network_app("http://localhost:3000", "http://localhost:3000", &list));
        assert!(!is_single_network_app("https://other.example", "http://localhost:3000", &list));
        // primary origin wins even if it is also listed
        let list = OriginAllowlist::from_urls(["http://localhost:3000/#"]);
        assert!(!is_single_network_app("http://localhost:3000", "http://localhost:3000", &list));
    }

    #[test]
    fn display_format() {
        assert_eq!(MigrationState::Migrating(3).to_string(), "migrating:3");
        assert_eq!(MigrationState::Complete.to_string(), "complete");
    }

    fn arb_event(max_index: usize) -> impl Strategy<Value = MigrationEvent> {
        prop_oneof![
            (0..max_index).prop_map(|origin_index| MigrationEvent::PayloadApplied { origin_index }),
            Just(MigrationEvent::PayloadRejected),
        ]
    }

    proptest! {
        /// The index never decreases and never moves more than one step
        #[test]
        fn progress_is_monotonic_single_step(
            n in 1usize..6,
            events in proptest::collection::vec(arb_event(8), 0..40),
        ) {
            let mut state = MigrationState::initial(n);
            for event in events {
                let before = state.progress(n);
                state = transition(state, event, n);
                let after = state.progress(n);
                prop_assert!(after >= before);
                prop_assert!(after - before <= 1);
                prop_assert!(after <= n);
            }
        }

        /// N in-order payloads always complete the migration
        #[test]
        fn in_order_payloads_complete(n in 1usize..10) {
            let mut state = MigrationState::initial(n);
            for origin_index in 0..n {
                state = transition(state, MigrationEvent::PayloadApplied { origin_index }, n);
            }
            prop_assert_eq!(state, MigrationState::Complete);
            prop_assert_eq!(state.progress(n), n);
        }
    }
}
