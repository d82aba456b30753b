/*
 * Kernel Logging System
 *
 * `log` backend for the kernel. Each record is rendered as
 * `[LEVEL] target: message` into a fixed-size line buffer and handed to
 * the registered sink in one piece, so lines from interrupt context and
 * system-call context never interleave mid-line.
 *
 * The logger never allocates. Lines longer than `LOG_LINE_CAPACITY` are
 * truncated.
 */

use core::fmt::Write;

use heapless::String;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use spin::Once;

use crate::config::LOG_LINE_CAPACITY;

/// Receives one complete, newline-terminated log line.
pub type LogSink = fn(&str);

/// Custom logger implementation for the kernel.
struct KernelLogger {
    sink: Once<LogSink>,
}

impl log::Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(sink) = self.sink.get() {
            sink(&format_record(record));
        }
    }

    fn flush(&self) {}
}

/// The KernelLogger instance used for logging.
static LOGGER: KernelLogger = KernelLogger { sink: Once::new() };

/// Writes into a line buffer, silently stopping when only the byte
/// reserved for the newline is left.
struct LineWriter<'a>(&'a mut String<LOG_LINE_CAPACITY>);

impl Write for LineWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.len() + c.len_utf8() >= LOG_LINE_CAPACITY || self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render a record, truncating at the line capacity.
fn format_record(record: &Record) -> String<LOG_LINE_CAPACITY> {
    let mut line = String::new();
    let _ = write!(
        LineWriter(&mut line),
        "[{}] {}: {}",
        record.level(),
        record.target(),
        record.args()
    );
    let _ = line.push('\n');
    line
}

/// Install the kernel logger, writing lines to `sink` and discarding
/// records above `level`.
///
/// Only the first call installs a logger; later calls return the error
/// from `log::set_logger`.
pub fn init(sink: LogSink, level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.sink.call_once(|| sink);
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
