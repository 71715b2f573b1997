//! Logging infrastructure for the browser bridge
//!
//! `tracing` events from the core are formatted by `tracing-subscriber` and
//! written to the browser console, one console call per event.

use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;

// Console bindings
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    pub fn error(s: &str);
}

/// Install the panic hook and the console tracing subscriber.
///
/// `directives` uses `EnvFilter` syntax, e.g. `"migrator_core=debug"`.
/// Calling this more than once is harmless.
pub fn init_logging(directives: &str) {
    console_error_panic_hook::set_once();

    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_target(true)
        .try_init();
}

/// Creates one [`ConsoleWriter`] per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

/// Buffers one formatted event and hands it to the console on drop.
#[derive(Debug)]
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        match self.level {
            Level::ERROR => error(line),
            Level::WARN => warn(line),
            _ => log(line),
        }
    }
}

/// Log an info message to browser console
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::logging::log(&format_args!($($t)*).to_string())
    }
}

/// Log a warning message to browser console
#[macro_export]
macro_rules! console_warn {
    ($($t:tt)*) => {
        $crate::logging::warn(&format_args!($($t)*).to_string())
    }
}

/// Log an error message to browser console
#[macro_export]
macro_rules! console_error {
    ($($t:tt)*) => {
        $crate::logging::error(&format_args!($($t)*).to_string())
    }
}
