//! Cross-document message envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `{ migrate, payload }` structure posted by a target's migration page.
///
/// Both fields are optional on the wire: unrelated cross-origin traffic
/// deserializes to a non-migrate envelope instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationEnvelope {
    /// Set by the sender on migration messages
    #[serde(default)]
    pub migrate: bool,
    /// Two-layer JSON payload, see [`crate::payload`]
    #[serde(default)]
    pub payload: String,
}

impl MigrationEnvelope {
    /// Creates a migration envelope carrying `payload`.
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            migrate: true,
            payload: payload.into(),
        }
    }

    /// Reads the envelope out of posted message data.
    ///
    /// Only object data can carry an envelope; strings and other primitives
    /// have no `migrate` field and yield a non-migrate envelope. `migrate`
    /// follows JavaScript truthiness, and a non-string `payload` reads as
    /// empty.
    pub fn from_data(data: &Value) -> Self {
        let Value::Object(fields) = data else {
            return Self::default();
        };
        let migrate = fields.get("migrate").is_some_and(is_truthy);
        let payload = match fields.get("payload") {
            Some(Value::String(payload)) => payload.clone(),
            _ => String::new(),
        };
        Self { migrate, payload }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One inbound message event, untrusted until validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessageEvent {
    /// Origin reported by the platform for the sender
    pub origin: String,
    /// Message data
    pub data: MigrationEnvelope,
}

impl InboundMessageEvent {
    /// Creates an event from its sender origin and data.
    pub fn new(origin: impl Into<String>, data: MigrationEnvelope) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_fields_default_when_missing() {
        let envelope = MigrationEnvelope::from_data(&json!({"type": "resize"}));
        assert!(!envelope.migrate);
        assert!(envelope.payload.is_empty());
    }

    #[test]
    fn primitive_data_is_not_a_migration() {
        assert_eq!(MigrationEnvelope::from_data(&json!(42)), MigrationEnvelope::default());
        assert_eq!(MigrationEnvelope::from_data(&Value::Null), MigrationEnvelope::default());
    }

    #[test]
    fn string_data_is_never_an_envelope() {
        let text = r#"{"migrate":true,"payload":"{\"_immortal|v2_x\":\"\\\"y\\\"\"}"}"#;
        assert_eq!(
            MigrationEnvelope::from_data(&Value::String(text.to_string())),
            MigrationEnvelope::default()
        );
    }

    #[test]
    fn migrate_follows_truthiness() {
        assert!(MigrationEnvelope::from_data(&json!({"migrate": 1, "payload": "{}"})).migrate);
        assert!(MigrationEnvelope::from_data(&json!({"migrate": "yes"})).migrate);
        assert!(!MigrationEnvelope::from_data(&json!({"migrate": 0})).migrate);
        assert!(!MigrationEnvelope::from_data(&json!({"migrate": ""})).migrate);
        assert!(!MigrationEnvelope::from_data(&json!({"migrate": null})).migrate);
    }

    #[test]
    fn non_string_payload_reads_as_empty() {
        let envelope = MigrationEnvelope::from_data(&json!({"migrate": true, "payload": {"k": "v"}}));
        assert!(envelope.migrate);
        assert!(envelope.payload.is_empty());
    }

    #[test]
    fn envelope_reads_wire_shape() {
        let envelope = MigrationEnvelope::from_data(&json!({"migrate": true, "payload": "{}"}));
        assert_eq!(envelope, MigrationEnvelope::new("{}"));
    }
}
