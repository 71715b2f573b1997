//! Two-layer payload serialization
//!
//! The sender serializes every storage slot independently, then bundles the
//! slots into one JSON object:
//!
//! ```text
//! outer:  { "<key>": "<inner>", ... }     JSON object of strings
//! inner:  "<JSON text of the stored value>"
//! ```
//!
//! Both layers must be preserved exactly to interoperate with the sender.

use crate::errors::DecodeError;
use indexmap::IndexMap;
use serde_json::Value;

/// Decoded payload entries in the sender's insertion order.
pub type DecodedPayload = IndexMap<String, String>;

/// Decodes both layers of a migration payload.
///
/// An inner value that is a JSON string yields the string itself; any other
/// JSON value yields its compact JSON text. Fails on the first malformed
/// layer; callers must then treat the whole message as rejected.
pub fn decode(raw: &str) -> Result<DecodedPayload, DecodeError> {
    let outer: IndexMap<String, String> =
        serde_json::from_str(raw).map_err(|e| DecodeError::Envelope(e.to_string()))?;

    let mut decoded = IndexMap::with_capacity(outer.len());
    for (key, encoded) in outer {
        let value: Value = match serde_json::from_str(&encoded) {
            Ok(value) => value,
            Err(e) => {
                return Err(DecodeError::Entry {
                    key,
                    reason: e.to_string(),
                })
            }
        };
        let value = match value {
            Value::String(text) => text,
            other => other.to_string(),
        };
        decoded.insert(key, value);
    }
    Ok(decoded)
}

/// Encodes entries into the two-layer wire format understood by [`decode`].
pub fn encode(entries: &DecodedPayload) -> String {
    let outer: serde_json::Map<String, Value> = entries
        .iter()
        .map(|(key, value)| {
            let inner = Value::String(value.clone()).to_string();
            (key.clone(), Value::String(inner))
        })
        .collect();
    Value::Object(outer).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn decodes_persisted_entry_once() {
        let decoded = decode(r#"{"_immortal|v2_foo":"\"bar\""}"#).unwrap();
        assert_eq!(decoded.get("_immortal|v2_foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn address_book_stays_json_text_after_one_layer() {
        let decoded = decode(r#"{"SAFE__addressBook":"\"{\\\"entries\\\":[]}\""}"#).unwrap();
        assert_eq!(
            decoded.get("SAFE__addressBook").map(String::as_str),
            Some(r#"{"entries":[]}"#)
        );
    }

    #[test]
    fn non_string_inner_values_keep_json_text() {
        let decoded = decode(r#"{"a":"42","b":"{\"x\":true}"}"#).unwrap();
        assert_eq!(decoded["a"], "42");
        assert_eq!(decoded["b"], r#"{"x":true}"#);
    }

    #[test]
    fn preserves_insertion_order() {
        let decoded = decode(r#"{"z":"1","a":"2","m":"3"}"#).unwrap();
        let keys: Vec<&str> = decoded.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn rejects_non_json_envelope() {
        assert_matches!(decode("not-json"), Err(DecodeError::Envelope(_)));
    }

    #[test]
    fn rejects_non_string_outer_values() {
        assert_matches!(decode(r#"{"k": 1}"#), Err(DecodeError::Envelope(_)));
    }

    #[test]
    fn rejects_malformed_inner_value() {
        assert_matches!(
            decode(r#"{"good":"\"ok\"","bad":"{oops"}"#),
            Err(DecodeError::Entry { key, .. }) if key == "bad"
        );
    }

    #[test]
    fn encode_matches_sender_format() {
        let mut entries = DecodedPayload::new();
        entries.insert("_immortal|v2_foo".into(), "bar".into());
        let wire = encode(&entries);
        assert_eq!(wire, r#"{"_immortal|v2_foo":"\"bar\""}"#);
        assert_eq!(decode(&wire).unwrap(), entries);
    }
}
