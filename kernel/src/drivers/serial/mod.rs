/*
 * Serial Communication Drivers
 *
 * Register-level 16550 UART access. The interrupt-driven line discipline
 * built on top of it lives in `components::tty`.
 */

pub mod uart_16550;

pub use uart_16550::{IntEnFlags, LineStsFlags, SerialPort};
