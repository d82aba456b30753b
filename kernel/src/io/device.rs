/*
 * Device Abstraction Layer
 *
 * Capability interface every character device implements, the closed set
 * of device kinds the registry can hold, and the error types the I/O layer
 * reports.
 *
 * Adding a device type means adding a `DeviceKind` variant and its
 * `CharDevice` impl.
 */

use core::fmt;

use crate::arch::Platform;
use crate::components::tty::{LineSnapshot, SerialIrq, TtyLine};
use crate::config::DeviceClass;

/// Dense index into the device table.
pub type DeviceId = usize;

/// Static facts about a device table slot, handed to its init routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub base_port: u16,
}

/// Errors reported by read/write/control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoError {
    /// Device index outside `0..NDEVS`.
    InvalidDevice,
    /// Control code the device does not recognize.
    InvalidControlCode,
    /// The device's init routine failed or never ran.
    NotInitialized,
    /// User buffer pointer is null or wraps the address space.
    BadAddress,
}

impl IoError {
    /// Value returned in place of a byte count or status on any failure.
    pub const SENTINEL: isize = -1;
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::InvalidDevice => f.write_str("invalid device"),
            IoError::InvalidControlCode => f.write_str("invalid control code"),
            IoError::NotInitialized => f.write_str("device not initialized"),
            IoError::BadAddress => f.write_str("bad buffer address"),
        }
    }
}

/// Errors from a device init routine. Nobody waits on init, so these are
/// logged by `init_all` and the device stays unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The table entry names a base port the driver has no IRQ for.
    UnknownBasePort { dev: DeviceId, base: u16 },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::UnknownBasePort { dev, base } => {
                write!(f, "bad device table entry, dev {} base port 0x{:03x}", dev, base)
            }
        }
    }
}

/// Character device entry points.
pub trait CharDevice<P: Platform> {
    /// One-time setup, run with interrupts masked.
    fn init(&self, platform: &P, info: DeviceInfo) -> Result<(), InitError>;

    /// Fill `buf` completely; returns `buf.len()`.
    fn read(&self, platform: &P, buf: &mut [u8]) -> Result<usize, IoError>;

    /// Accept all of `buf`; returns `buf.len()`.
    fn write(&self, platform: &P, buf: &[u8]) -> Result<usize, IoError>;

    /// Device control (ioctl).
    fn control(&self, code: u32, val: i32) -> Result<(), IoError>;
}

/// The closed set of device kinds.
pub enum DeviceKind<P: Platform> {
    Serial(TtyLine<P>),
}

impl<P: Platform> DeviceKind<P> {
    /// Fresh, uninitialized device for a table class.
    pub const fn for_class(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Serial => DeviceKind::Serial(TtyLine::new()),
        }
    }

    /// IRQ this device is wired to, if any.
    pub fn irq(&self, info: &DeviceInfo) -> Option<u8> {
        match self {
            DeviceKind::Serial(_) => SerialIrq::from_base(info.base_port).map(SerialIrq::irq),
        }
    }

    pub fn handle_interrupt(&self, platform: &P, irq: u8) {
        match self {
            DeviceKind::Serial(line) => line.handle_interrupt(platform, irq),
        }
    }

    pub fn snapshot(&self) -> Option<LineSnapshot> {
        match self {
            DeviceKind::Serial(line) => line.snapshot(),
        }
    }
}

impl<P: Platform> CharDevice<P> for DeviceKind<P> {
    fn init(&self, platform: &P, info: DeviceInfo) -> Result<(), InitError> {
        match self {
            DeviceKind::Serial(line) => line.init(platform, info),
        }
    }

    fn read(&self, platform: &P, buf: &mut [u8]) -> Result<usize, IoError> {
        match self {
            DeviceKind::Serial(line) => line.read(platform, buf),
        }
    }

    fn write(&self, platform: &P, buf: &[u8]) -> Result<usize, IoError> {
        match self {
            DeviceKind::Serial(line) => line.write(platform, buf),
        }
    }

    fn control(&self, code: u32, val: i32) -> Result<(), IoError> {
        match self {
            DeviceKind::Serial(line) => line.control(code, val),
        }
    }
}
