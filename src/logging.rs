//! Browser Console Logging
//!
//! A `tracing-subscriber` fmt layer whose writer forwards each formatted
//! event to the matching `console.*` method.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Install the global subscriber. Safe to call more than once.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(level)
        .try_init();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one event and emits it on drop
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let line = String::from_utf8_lossy(&self.buffer).trim_end().to_string();
        self.buffer.clear();
        (!line.is_empty()).then_some(line)
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
        if let Some(line) = self.take_line() {
            let message = JsValue::from_str(&line);
            match console_method(self.level) {
                "error" => web_sys::console::error_1(&message),
                "warn" => web_sys::console::warn_1(&message),
                "debug" => web_sys::console::debug_1(&message),
                _ => web_sys::console::log_1(&message),
            }
        }
    }
}

fn console_method(level: Level) -> &'static str {
    match level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "log",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_levels_map_to_console_methods() {
        assert_eq!(console_method(Level::ERROR), "error");
        assert_eq!(console_method(Level::WARN), "warn");
        assert_eq!(console_method(Level::INFO), "log");
        assert_eq!(console_method(Level::TRACE), "debug");
    }

    #[test]
    fn test_writer_collects_one_line() {
        let mut writer = ConsoleWriter::new(Level::INFO);
        writer.write_all(b" INFO logged in").unwrap();
        writer.write_all(b" as me\n").unwrap();
        assert_eq!(writer.take_line().as_deref(), Some(" INFO logged in as me"));
        // Drained, so dropping emits nothing
        assert_eq!(writer.take_line(), None);
    }
}
