//! Provenance check for inbound migration messages

use crate::allowlist::OriginAllowlist;
use crate::message::InboundMessageEvent;

/// Whether `event` is a genuine migration payload from a trusted, distinct origin.
///
/// Self-origin messages are always rejected, even when the own origin is
/// itself allowlisted, so the coordinator never reacts to its own traffic.
pub fn is_acceptable_migration_message(
    event: &InboundMessageEvent,
    own_origin: &str,
    allowlist: &OriginAllowlist,
) -> bool {
    if !event.data.migrate {
        return false;
    }
    if event.origin == own_origin {
        return false;
    }
    allowlist.is_trusted(&event.origin)
}
