/*
 * Device Drivers Built on the I/O Layer
 */

pub mod tty;
