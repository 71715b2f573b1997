//! Browser tests for the migrator bridge.
//!
//! Run with `wasm-pack test --headless --firefox crates/migrator-wasm`.

#![cfg(target_arch = "wasm32")]

use migrator_core::MigrationEnvelope;
use migrator_wasm::listener::envelope_from_js;
use migrator_wasm::bridge::StatusReader;
use migrator_wasm::StoreMigratorJs;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn object(migrate: JsValue, payload: JsValue) -> JsValue {
    let data = js_sys::Object::new();
    js_sys::Reflect::set(&data, &"migrate".into(), &migrate).unwrap();
    js_sys::Reflect::set(&data, &"payload".into(), &payload).unwrap();
    data.into()
}

fn frame_count() -> u32 {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.query_selector_all("iframe[name=targetWindow]").ok())
        .map(|list| list.length())
        .unwrap_or(0)
}

#[wasm_bindgen_test]
fn object_envelope_uses_truthiness() {
    let envelope = envelope_from_js(&object(JsValue::from(1), JsValue::from_str("{}")));
    assert_eq!(envelope, MigrationEnvelope::new("{}"));

    let envelope = envelope_from_js(&object(JsValue::from(0), JsValue::from_str("{}")));
    assert!(!envelope.migrate);
}

#[wasm_bindgen_test]
fn primitive_data_is_not_a_migration() {
    assert_eq!(envelope_from_js(&JsValue::from(7)), MigrationEnvelope::default());
    assert_eq!(envelope_from_js(&JsValue::NULL), MigrationEnvelope::default());
}

#[wasm_bindgen_test]
fn string_data_is_never_an_envelope() {
    let envelope = envelope_from_js(&JsValue::from_str(r#"{"migrate":true,"payload":"{}"}"#));
    assert_eq!(envelope, MigrationEnvelope::default());
}

#[wasm_bindgen_test]
fn activation_creates_single_hidden_frame_and_deactivation_removes_it() {
    let on_import = js_sys::Function::new_no_args("");
    let config = r#"{"targets":["http://127.0.0.1:9/#"],"primary_origin":"http://primary.test"}"#;
    let mut migrator = StoreMigratorJs::new(
        Some(config.to_string()),
        on_import,
        None,
        None,
        Some("http://primary.test".to_string()),
    )
    .unwrap();

    migrator.activate().unwrap();
    assert!(migrator.is_active());
    assert_eq!(migrator.state(), "migrating:0");
    assert_eq!(frame_count(), 1);

    migrator.deactivate().unwrap();
    assert!(!migrator.is_active());
    assert_eq!(frame_count(), 0);
}

#[wasm_bindgen_test]
fn target_origin_does_not_create_frame() {
    let on_import = js_sys::Function::new_no_args("");
    let config = r#"{"targets":["http://127.0.0.1:9/#"],"primary_origin":"http://primary.test"}"#;
    let mut migrator = StoreMigratorJs::new(
        Some(config.to_string()),
        on_import,
        None,
        None,
        Some("http://127.0.0.1:9".to_string()),
    )
    .unwrap();

    migrator.activate().unwrap();
    assert!(migrator.is_complete());
    assert_eq!(frame_count(), 0);
}

#[wasm_bindgen_test]
fn import_callback_can_read_status_while_message_is_handled() {
    let reader_slot: Rc<RefCell<Option<StatusReader>>> = Rc::new(RefCell::new(None));
    let observed: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let slot = reader_slot.clone();
    let seen = observed.clone();
    let callback = Closure::wrap(Box::new(move |_address_book: JsValue| {
        if let Some(reader) = slot.borrow().as_ref() {
            seen.borrow_mut().push(reader.state().to_string());
        }
    }) as Box<dyn FnMut(JsValue)>);
    let on_import: js_sys::Function = callback.as_ref().unchecked_ref::<js_sys::Function>().clone();
    callback.forget();

    let config = r#"{"targets":["http://127.0.0.1:9/#"],"primary_origin":"http://primary.test"}"#;
    let mut migrator = StoreMigratorJs::new(
        Some(config.to_string()),
        on_import,
        None,
        None,
        Some("http://primary.test".to_string()),
    )
    .unwrap();
    *reader_slot.borrow_mut() = Some(migrator.status_reader());
    migrator.activate().unwrap();

    let init = web_sys::MessageEventInit::new();
    init.set_origin("http://127.0.0.1:9");
    init.set_data(&object(
        JsValue::TRUE,
        JsValue::from_str(r#"{"SAFE__addressBook":"\"{\\\"entries\\\":[]}\""}"#),
    ));
    let event = web_sys::MessageEvent::new_with_event_init_dict("message", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();

    assert_eq!(*observed.borrow(), vec!["migrating:0".to_string()]);
    assert_eq!(migrator.state(), "complete");
    assert!(migrator.is_complete());
    assert_eq!(frame_count(), 0);

    migrator.deactivate().unwrap();
}
