/*
 * Polled Kernel Console
 *
 * Log output to COM1 by busy-waiting on the transmitter, with interrupts
 * masked for the duration of a line. This bypasses the interrupt-driven
 * TTY queues entirely, so it is usable before `init_all`, from interrupt
 * handlers, and from inside a panic.
 */

use log::{LevelFilter, SetLoggerError};
use spin::Mutex;

use super::Cpu;
use crate::arch::without_interrupts;
use crate::config::{COM1_BASE, DEFAULT_LOG_LEVEL};
use crate::drivers::serial::SerialPort;
use crate::io::Pio;
use crate::utils::logger;

static CONSOLE: Mutex<SerialPort<Pio<u8>>> = Mutex::new(SerialPort::<Pio<u8>>::new(COM1_BASE));

/// Write `s` to the console, translating `\n` to `\r\n`.
pub fn write_str(s: &str) {
    without_interrupts::<Cpu, _>(|| {
        let mut port = CONSOLE.lock();
        for b in s.bytes() {
            port.write(b);
        }
    });
}

/// Install the kernel logger with the console as its sink.
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    logger::init(write_str, level)
}

/// `init_logging` at `DEFAULT_LOG_LEVEL`.
pub fn init_default_logging() -> Result<(), SetLoggerError> {
    init_logging(DEFAULT_LOG_LEVEL)
}
