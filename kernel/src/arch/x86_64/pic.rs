/*
 * 8259 Programmable Interrupt Controller
 *
 * Master PIC delivers IRQ 0-7 at vectors 32-39, slave IRQ 8-15 at 40-47.
 * Only the cascade line and the IRQs a driver explicitly enables are
 * unmasked.
 */

use pic8259::ChainedPics;
use spin::Mutex;

use crate::arch::InterruptController;
use crate::config::{PIC_1_OFFSET, PIC_2_OFFSET};

/// IRQ 2 chains the slave PIC into the master.
const CASCADE_IRQ: u8 = 2;

pub struct Pic8259 {
    pics: Mutex<ChainedPics>,
}

impl Pic8259 {
    pub const fn new() -> Self {
        Self {
            // SAFETY: offsets place the PIC vectors above the CPU exceptions
            pics: Mutex::new(unsafe { ChainedPics::new(PIC_1_OFFSET, PIC_2_OFFSET) }),
        }
    }

    /// Remap both PICs and mask everything except the cascade.
    pub fn init(&self) {
        let mut pics = self.pics.lock();
        unsafe {
            pics.initialize();
            pics.write_masks(!(1 << CASCADE_IRQ), 0xFF);
        }
        log::info!(
            "PIC remapped to vectors 0x{:02x}/0x{:02x}",
            PIC_1_OFFSET,
            PIC_2_OFFSET
        );
    }

    /// Interrupt vector the PIC raises for `irq`.
    pub const fn vector(irq: u8) -> u8 {
        if irq < 8 {
            PIC_1_OFFSET + irq
        } else {
            PIC_2_OFFSET + (irq - 8)
        }
    }
}

impl Default for Pic8259 {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for Pic8259 {
    fn enable_irq(&self, irq: u8) {
        let mut pics = self.pics.lock();
        unsafe {
            let [mut master, mut slave] = pics.read_masks();
            if irq < 8 {
                master &= !(1 << irq);
            } else {
                slave &= !(1 << (irq - 8));
            }
            pics.write_masks(master, slave);
        }
    }

    fn end_of_interrupt(&self, irq: u8) {
        unsafe {
            self.pics.lock().notify_end_of_interrupt(Pic8259::vector(irq));
        }
    }

    fn vector(&self, irq: u8) -> u8 {
        Pic8259::vector(irq)
    }
}
