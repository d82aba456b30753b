/*
 * Interrupt Masking
 *
 * On a single CPU the only source of preemption is a hardware interrupt, so
 * masking interrupts is the critical-section primitive. `DisableInterrupts`
 * masks for its lifetime and afterwards restores whatever state it found,
 * which keeps nested critical sections correct.
 */

use core::marker::PhantomData;

/// CPU-wide interrupt enable flag.
pub trait InterruptFlag {
    /// Check if interrupts are enabled.
    fn are_enabled() -> bool;

    /// Enable interrupts globally.
    fn enable();

    /// Disable interrupts globally.
    fn disable();
}

/// RAII guard that disables interrupts for its lifetime
///
/// Interrupts are disabled when this guard is created and re-enabled on drop
/// only if they were enabled before, so a guard taken inside another
/// critical section leaves interrupts masked.
///
/// # Example
/// ```ignore
/// let _guard = DisableInterrupts::<Cpu>::new();
/// // Critical section - interrupts are disabled
/// ```
pub struct DisableInterrupts<F: InterruptFlag> {
    were_enabled: bool,
    _flag: PhantomData<fn() -> F>,
}

impl<F: InterruptFlag> DisableInterrupts<F> {
    /// Create a new interrupt guard, disabling interrupts
    pub fn new() -> Self {
        let were_enabled = F::are_enabled();
        if were_enabled {
            F::disable();
        }
        Self {
            were_enabled,
            _flag: PhantomData,
        }
    }

    /// Whether interrupts were enabled when the guard was taken.
    #[cfg(test)]
    fn were_enabled(&self) -> bool {
        self.were_enabled
    }
}

impl<F: InterruptFlag> Default for DisableInterrupts<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: InterruptFlag> Drop for DisableInterrupts<F> {
    fn drop(&mut self) {
        // Only re-enable if they were enabled before
        if self.were_enabled {
            F::enable();
        }
    }
}

/// Execute a closure with interrupts disabled, restoring the previous state.
pub fn without_interrupts<F, R>(f: impl FnOnce() -> R) -> R
where
    F: InterruptFlag,
{
    let _guard = DisableInterrupts::<F>::new();
    f()
}
