/*
 * System Call Trap Dispatch
 *
 * A trap carries a 4-tuple (code, device, buffer, length). The code selects
 * process exit, device read, or device write; anything else is logged and
 * has no effect.
 *
 * The trap gate and its assembly stub are set up by the kernel image; the
 * stub passes the registers to `dispatch_raw` and acts on the returned
 * `TrapOutcome`.
 */

pub mod handlers;
pub mod numbers;

use handlers::*;
use numbers::*;

use crate::arch::Platform;
use crate::io::{DeviceRegistry, IoError};

pub use handlers::{Trap, TrapOutcome};

/// Carry out a decoded trap.
pub fn dispatch<P: Platform>(registry: &DeviceRegistry<P>, trap: Trap<'_>) -> TrapOutcome {
    log::trace!("syscall {}", trap_number(&trap));
    match trap {
        Trap::Exit { status } => sys_exit(status),
        Trap::Read { dev, buf } => sys_read(registry, dev, buf),
        Trap::Write { dev, buf } => sys_write(registry, dev, buf),
    }
}

/// Decode trap registers and dispatch.
///
/// # Safety
/// For `SYS_READ` `buf` must be valid for writes of `len` bytes, for
/// `SYS_WRITE` valid for reads of `len` bytes, and nothing else may access
/// that memory until the call returns. Null or wrapping buffers are
/// rejected with the sentinel.
pub unsafe fn dispatch_raw<P: Platform>(
    registry: &DeviceRegistry<P>,
    code: usize,
    dev: i32,
    buf: *mut u8,
    len: usize,
) -> TrapOutcome {
    match code {
        SYS_EXIT => dispatch(registry, Trap::Exit { status: dev }),
        SYS_READ | SYS_WRITE => {
            if let Err(err) = validate_user_ptr(buf, len) {
                log::debug!("syscall {}: {}", code, err);
                return TrapOutcome::Complete(IoError::SENTINEL);
            }
            let trap = if len == 0 {
                match code {
                    SYS_READ => Trap::Read { dev, buf: &mut [] },
                    _ => Trap::Write { dev, buf: &[] },
                }
            } else if code == SYS_READ {
                // SAFETY: validated non-null and non-wrapping, caller
                // guarantees exclusive access for len bytes
                Trap::Read {
                    dev,
                    buf: unsafe { core::slice::from_raw_parts_mut(buf, len) },
                }
            } else {
                // SAFETY: as above, shared access suffices
                Trap::Write {
                    dev,
                    buf: unsafe { core::slice::from_raw_parts(buf, len) },
                }
            };
            dispatch(registry, trap)
        }
        _ => sys_unknown(code),
    }
}
