/*
 * Static I/O Configuration
 *
 * The device table and the fixed hardware identities the serial driver
 * knows about. The table is dense: device index N is entry N.
 */

use log::LevelFilter;

/// Number of entries in the device table.
pub const NDEVS: usize = 2;

/// Device index of the first serial line (COM1).
pub const TTY0: usize = 0;
/// Device index of the second serial line (COM2).
pub const TTY1: usize = 1;

/// Capacity of every per-line byte queue.
pub const QUEUE_CAPACITY: usize = 6;

/// COM1 UART base port and its IRQ line.
pub const COM1_BASE: u16 = 0x3F8;
pub const COM1_IRQ: u8 = 4;

/// COM2 UART base port and its IRQ line.
pub const COM2_BASE: u16 = 0x2F8;
pub const COM2_IRQ: u8 = 3;

/// Master PIC starts at interrupt 32, slave at 40.
pub const PIC_1_OFFSET: u8 = 0x20;
pub const PIC_2_OFFSET: u8 = PIC_1_OFFSET + 8;

/// The only recognized control code: `val != 0` turns echo on.
pub const ECHO_CONTROL: u32 = 1;

/// Log records above this level are discarded.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Longest formatted log line; longer records are truncated.
pub const LOG_LINE_CAPACITY: usize = 192;

/// Kind of driver bound to a device table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Interrupt-driven 16550 serial line.
    Serial,
}

/// One row of the static device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    pub class: DeviceClass,
    pub base_port: u16,
}

impl DeviceConfig {
    pub const fn serial(base_port: u16) -> Self {
        Self {
            class: DeviceClass::Serial,
            base_port,
        }
    }
}

/// Default device table: TTY0 on COM1, TTY1 on COM2.
pub const DEVICE_TABLE: [DeviceConfig; NDEVS] = [
    DeviceConfig::serial(COM1_BASE), // TTY0
    DeviceConfig::serial(COM2_BASE), // TTY1
];
