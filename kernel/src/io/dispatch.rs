/*
 * Device-Independent I/O Dispatch
 *
 * The only surface callers use. Every operation validates the device index
 * before forwarding to the entry's driver, and reports failure with the
 * uniform sentinel (-1) instead of an error value.
 */

use super::device::{CharDevice, IoError};
use super::registry::DeviceRegistry;
use crate::arch::{DisableInterrupts, InterruptController, InterruptFlag, Platform};

/// Collapse a driver result into a byte count or the sentinel.
fn sentinel(result: Result<usize, IoError>) -> isize {
    match result {
        Ok(count) => count as isize,
        Err(err) => {
            log::debug!("I/O request failed: {}", err);
            IoError::SENTINEL
        }
    }
}

impl<P: Platform> DeviceRegistry<P> {
    /// Run every device's init routine once, in table order, with
    /// interrupts masked, then unmask them.
    ///
    /// A device that fails to initialize is logged and left unusable; the
    /// remaining devices are still initialized.
    pub fn init_all(&self) {
        let masked = DisableInterrupts::<P::Cpu>::new();
        for entry in self.entries() {
            if let Err(err) = entry.device().init(self.platform(), entry.info()) {
                log::error!("init: {}", err);
            }
        }
        drop(masked);
        P::Cpu::enable();
    }

    /// Read exactly `buf.len()` bytes from `dev`.
    pub fn read(&self, dev: i32, buf: &mut [u8]) -> isize {
        sentinel(
            self.entry(dev)
                .and_then(|entry| entry.device().read(self.platform(), buf)),
        )
    }

    /// Queue all of `buf` for output on `dev`.
    pub fn write(&self, dev: i32, buf: &[u8]) -> isize {
        sentinel(
            self.entry(dev)
                .and_then(|entry| entry.device().write(self.platform(), buf)),
        )
    }

    /// Device control; 0 on success.
    pub fn control(&self, dev: i32, code: u32, val: i32) -> isize {
        sentinel(
            self.entry(dev)
                .and_then(|entry| entry.device().control(code, val))
                .map(|()| 0),
        )
    }

    /// Route a hardware interrupt on `irq` to the device wired to it.
    ///
    /// An IRQ no device claims is still acknowledged.
    pub fn handle_irq(&self, irq: u8) {
        let owner = self
            .entries()
            .iter()
            .find(|entry| entry.device().irq(&entry.info()) == Some(irq));

        match owner {
            Some(entry) => entry.device().handle_interrupt(self.platform(), irq),
            None => {
                self.platform().pic().end_of_interrupt(irq);
                log::warn!("spurious IRQ {}", irq);
            }
        }
    }
}
