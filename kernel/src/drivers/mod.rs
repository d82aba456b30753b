/*
 * Hardware Drivers
 *
 * Register-level drivers, independent of how the kernel schedules or
 * buffers I/O.
 */

pub mod serial;
