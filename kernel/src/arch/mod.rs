/*
 * Architecture Abstraction Layer
 *
 * Generic driver code never executes port I/O or touches the CPU interrupt
 * flag directly. It goes through the `Platform` capability defined here,
 * which the x86_64 module implements for real hardware and the test suite
 * implements with a simulated UART and PIC.
 *
 * Submodules:
 * - interrupts: interrupt-flag trait and the RAII masking guard
 * - x86_64: PC platform (PIO ports, 8259 PIC, IF flag, polled console)
 */

pub mod interrupts;

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

use crate::io::Io;

pub use interrupts::{DisableInterrupts, InterruptFlag, without_interrupts};

/// Programmable interrupt controller seen by drivers.
pub trait InterruptController: Sync {
    /// Let `irq` reach the CPU.
    fn enable_irq(&self, irq: u8);

    /// Acknowledge `irq` so the controller delivers further interrupts.
    fn end_of_interrupt(&self, irq: u8);

    /// CPU interrupt vector raised for `irq`.
    fn vector(&self, irq: u8) -> u8;
}

/// Everything a driver needs from the machine it runs on.
pub trait Platform: Sync {
    /// CPU interrupt flag.
    type Cpu: InterruptFlag;
    /// Byte-wide register handle.
    type Port: Io<Value = u8> + Send;
    /// Interrupt controller.
    type Pic: InterruptController;

    /// Handle for the register at I/O address `addr`.
    fn port(&self, addr: u16) -> Self::Port;

    fn pic(&self) -> &Self::Pic;

    /// Suspension point of every spin-wait. Called with interrupts enabled
    /// and no lock held, so interrupt handlers can make progress.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}
