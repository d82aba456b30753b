/*
 * System Call Numbers
 *
 * Trap code in EAX selects the call; i386 Linux numbering.
 *
 * Arguments:
 * - EBX: device index (exit status for SYS_EXIT)
 * - ECX: user buffer
 * - EDX: byte count
 */

/// Exit current process
///
/// Arguments: (status: i32) -> !
pub const SYS_EXIT: usize = 1;

/// Read from device
///
/// Arguments: (dev: i32, buf: *mut u8, count: usize) -> isize
/// Returns: count, or -1
pub const SYS_READ: usize = 3;

/// Write to device
///
/// Arguments: (dev: i32, buf: *const u8, count: usize) -> isize
/// Returns: count, or -1
pub const SYS_WRITE: usize = 4;
