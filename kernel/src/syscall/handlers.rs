/*
 * System Call Handlers
 *
 * Decoded trap requests and the handlers that carry them out against the
 * device registry.
 */

use super::numbers::*;
use crate::arch::{InterruptFlag, Platform};
use crate::io::{DeviceRegistry, IoError};

/// A decoded trap.
#[derive(Debug)]
pub enum Trap<'a> {
    Exit { status: i32 },
    Read { dev: i32, buf: &'a mut [u8] },
    Write { dev: i32, buf: &'a [u8] },
}

/// What the trap entry does after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Process finished; the entry stub hands control back to the monitor.
    Exit(i32),
    /// Return this value to the caller in EAX.
    Complete(isize),
    /// Unknown trap: reported, caller's registers left as they were.
    Ignored,
}

/// Validate a user buffer.
///
/// A zero-length buffer is always acceptable. Otherwise the pointer must be
/// non-null and the range must not wrap the address space.
pub fn validate_user_ptr<T>(ptr: *const T, count: usize) -> Result<(), IoError> {
    if count == 0 {
        return Ok(());
    }

    let addr = ptr as usize;
    if addr == 0 {
        return Err(IoError::BadAddress);
    }

    count
        .checked_mul(core::mem::size_of::<T>())
        .and_then(|len| addr.checked_add(len))
        .map(|_| ())
        .ok_or(IoError::BadAddress)
}

/// Trap entry runs with interrupts masked. Blocking device calls need
/// them on, or the line could never deliver the data they wait for.
fn enable_for_blocking_io<P: Platform>() {
    if !P::Cpu::are_enabled() {
        P::Cpu::enable();
    }
}

pub fn sys_exit(status: i32) -> TrapOutcome {
    log::info!("process exited with status {}", status);
    TrapOutcome::Exit(status)
}

pub fn sys_read<P: Platform>(registry: &DeviceRegistry<P>, dev: i32, buf: &mut [u8]) -> TrapOutcome {
    enable_for_blocking_io::<P>();
    TrapOutcome::Complete(registry.read(dev, buf))
}

pub fn sys_write<P: Platform>(registry: &DeviceRegistry<P>, dev: i32, buf: &[u8]) -> TrapOutcome {
    enable_for_blocking_io::<P>();
    TrapOutcome::Complete(registry.write(dev, buf))
}

pub fn sys_unknown(code: usize) -> TrapOutcome {
    log::warn!("trap code {} is not a valid system call", code);
    TrapOutcome::Ignored
}

/// Number of the call a trap decodes to, for logging.
pub fn trap_number(trap: &Trap<'_>) -> usize {
    match trap {
        Trap::Exit { .. } => SYS_EXIT,
        Trap::Read { .. } => SYS_READ,
        Trap::Write { .. } => SYS_WRITE,
    }
}
