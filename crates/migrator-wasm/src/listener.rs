//! Window `message` listener with scoped registration

use crate::error::{describe_js, WasmResult};
use migrator_core::{InboundMessageEvent, MigrationEnvelope, Subscription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, Window};

/// Reads the migration envelope out of posted message data.
///
/// Non-object data, strings included, is never a migration message. Object
/// data is snapshotted through `JSON.stringify`; values that cannot be
/// serialized are not migration messages either.
pub fn envelope_from_js(data: &JsValue) -> MigrationEnvelope {
    if !data.is_object() {
        return MigrationEnvelope::default();
    }
    let Ok(text) = js_sys::JSON::stringify(data) else {
        return MigrationEnvelope::default();
    };
    serde_json::from_str::<serde_json::Value>(&String::from(text))
        .map(|value| MigrationEnvelope::from_data(&value))
        .unwrap_or_default()
}

/// Converts a platform event into the core's event type.
pub fn inbound_event(event: &MessageEvent) -> InboundMessageEvent {
    InboundMessageEvent::new(event.origin(), envelope_from_js(&event.data()))
}

/// Registers `handler` for `message` events on `window`.
///
/// The returned subscription removes the listener when released or dropped.
pub fn subscribe_messages<F>(window: &Window, mut handler: F) -> WasmResult<Subscription>
where
    F: FnMut(InboundMessageEvent) + 'static,
{
    let onmessage: Closure<dyn FnMut(MessageEvent)> = Closure::new(move |event: MessageEvent| {
        handler(inbound_event(&event));
    });
    window.add_event_listener_with_callback("message", onmessage.as_ref().unchecked_ref())?;

    let target = window.clone();
    Ok(Subscription::new(move || {
        if let Err(err) = target
            .remove_event_listener_with_callback("message", onmessage.as_ref().unchecked_ref())
        {
            tracing::warn!(error = %describe_js(&err), "Failed to remove message listener");
        }
        drop(onmessage);
    }))
}
