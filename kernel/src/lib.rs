/*
 * TTY I/O Kernel Layer
 *
 * Device-independent character I/O for a small single-CPU x86 kernel, and
 * the interrupt-driven serial-line driver behind it.
 *
 * Layering, leaves first:
 * - io::queue: bounded byte FIFO shared by syscall and interrupt code
 * - io::registry / io::dispatch: device table and bounds-checked
 *   init_all/read/write/control
 * - components::tty: per-line queues, echo, blocking read, two-phase write,
 *   and the receive/transmit interrupt handler
 * - syscall: trap code -> exit/read/write
 *
 * Hardware is reached only through `arch::Platform`, implemented for the PC
 * in `arch::x86_64` and by a simulated UART/PIC in the test suite.
 *
 * The crate is no_std; the host test harness builds it with std.
 */

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod components;
pub mod config;
pub mod drivers;
pub mod io;
pub mod sync;
pub mod syscall;
pub mod utils;

#[cfg(test)]
mod tests;

pub use arch::{InterruptController, InterruptFlag, Platform};
pub use components::tty::{LineSnapshot, LineStats, TtyLine};
pub use io::{DeviceRegistry, IoError};
