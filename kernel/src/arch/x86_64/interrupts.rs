/*
 * CPU Interrupt Flag
 *
 * `InterruptFlag` for the x86_64 IF bit, via the x86_64 crate's
 * sti/cli/pushf wrappers.
 */

use x86_64::instructions::interrupts;

use crate::arch::InterruptFlag;

/// The executing CPU's interrupt flag.
pub struct Cpu;

impl InterruptFlag for Cpu {
    #[inline]
    fn are_enabled() -> bool {
        interrupts::are_enabled()
    }

    #[inline]
    fn enable() {
        interrupts::enable();
    }

    #[inline]
    fn disable() {
        interrupts::disable();
    }
}
