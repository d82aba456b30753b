/*
 * Device Registry
 *
 * Owns the platform and one entry per device table slot. Built once at
 * startup and then shared by reference with the dispatch layer, the IRQ
 * entry points and the syscall layer; the table itself is never modified
 * afterwards, so reading it needs no locking.
 */

use super::device::{DeviceId, DeviceInfo, DeviceKind, IoError};
use crate::arch::{InterruptController, Platform};
use crate::components::tty::LineSnapshot;
use crate::config::{DEVICE_TABLE, DeviceConfig, NDEVS};

/// One populated device table slot.
pub struct DeviceEntry<P: Platform> {
    info: DeviceInfo,
    device: DeviceKind<P>,
}

impl<P: Platform> DeviceEntry<P> {
    fn new(id: DeviceId, config: &DeviceConfig) -> Self {
        Self {
            info: DeviceInfo {
                id,
                base_port: config.base_port,
            },
            device: DeviceKind::for_class(config.class),
        }
    }

    pub fn info(&self) -> DeviceInfo {
        self.info
    }

    pub fn device(&self) -> &DeviceKind<P> {
        &self.device
    }
}

pub struct DeviceRegistry<P: Platform> {
    platform: P,
    entries: [DeviceEntry<P>; NDEVS],
}

impl<P: Platform> DeviceRegistry<P> {
    /// Registry for the default `DEVICE_TABLE`.
    pub fn new(platform: P) -> Self {
        Self::with_table(platform, &DEVICE_TABLE)
    }

    pub fn with_table(platform: P, table: &[DeviceConfig; NDEVS]) -> Self {
        Self {
            platform,
            entries: core::array::from_fn(|id| DeviceEntry::new(id, &table[id])),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn entries(&self) -> &[DeviceEntry<P>] {
        &self.entries
    }

    /// Bounds-checked lookup of a caller-supplied device index.
    pub fn entry(&self, dev: i32) -> Result<&DeviceEntry<P>, IoError> {
        usize::try_from(dev)
            .ok()
            .and_then(|idx| self.entries.get(idx))
            .ok_or(IoError::InvalidDevice)
    }

    /// Device index of the entry at hardware address `base`.
    pub fn device_for_base(&self, base: u16) -> Option<DeviceId> {
        self.entries
            .iter()
            .find(|entry| entry.info.base_port == base)
            .map(|entry| entry.info.id)
    }

    /// Interrupt vector the kernel image must route to `handle_irq` for
    /// `dev`. Fails for a table entry with no known IRQ.
    pub fn irq_vector(&self, dev: i32) -> Result<u8, IoError> {
        let entry = self.entry(dev)?;
        entry
            .device
            .irq(&entry.info)
            .map(|irq| self.platform.pic().vector(irq))
            .ok_or(IoError::NotInitialized)
    }

    /// Queue and flag state of an initialized line.
    pub fn snapshot(&self, dev: i32) -> Result<LineSnapshot, IoError> {
        self.entry(dev)?
            .device
            .snapshot()
            .ok_or(IoError::NotInitialized)
    }
}
