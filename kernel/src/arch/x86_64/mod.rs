/*
 * x86_64 PC Platform
 *
 * Real-hardware implementation of `Platform`:
 * - interrupts: the CPU IF flag (sti/cli)
 * - pic: the chained 8259 interrupt controllers
 * - console: polled COM1 writer used as the log sink
 *
 * The trap and IRQ vector stubs that call into `DeviceRegistry::handle_irq`
 * and `syscall::dispatch_raw` belong to the kernel image, not to this crate.
 */

pub mod console;
pub mod interrupts;
pub mod pic;

use crate::arch::Platform;
use crate::io::Pio;

pub use interrupts::Cpu;
pub use pic::Pic8259;

/// The PC: PIO ports, 8259 PICs, CPU interrupt flag.
pub struct PcPlatform {
    pic: Pic8259,
}

impl PcPlatform {
    pub const fn new() -> Self {
        Self {
            pic: Pic8259::new(),
        }
    }

    /// Reprogram the PICs with every IRQ except the cascade masked.
    ///
    /// Call once, before `DeviceRegistry::init_all`.
    pub fn init(&self) {
        self.pic.init();
    }
}

impl Default for PcPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for PcPlatform {
    type Cpu = Cpu;
    type Port = Pio<u8>;
    type Pic = Pic8259;

    fn port(&self, addr: u16) -> Pio<u8> {
        Pio::new(addr)
    }

    fn pic(&self) -> &Pic8259 {
        &self.pic
    }
}
