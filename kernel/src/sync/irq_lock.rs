/*
 * Interrupt-Safe Spinlock
 *
 * State shared between system-call code and an interrupt handler must only
 * be touched with interrupts masked. `IrqLock` ties the two together: taking
 * the lock masks interrupts (remembering the previous state) and then locks
 * a spin mutex; dropping the guard unlocks first and restores the interrupt
 * state last.
 *
 * On a single CPU with interrupts masked the mutex can never be contended.
 * Under the hosted test harness, where an "interrupt" is another thread,
 * the mutex supplies the exclusion that masking cannot.
 *
 * Never hold a guard across a spin-wait: the interrupt that would let the
 * wait finish could not be delivered.
 */

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

use spin::{Mutex, MutexGuard};

use crate::arch::{DisableInterrupts, InterruptFlag};

pub struct IrqLock<T, F> {
    inner: Mutex<T>,
    _flag: PhantomData<fn() -> F>,
}

/// Access to the protected value, with interrupts masked.
///
/// Field order matters: the mutex guard drops before the interrupt guard.
pub struct IrqLockGuard<'a, T, F: InterruptFlag> {
    guard: MutexGuard<'a, T>,
    _irq: DisableInterrupts<F>,
}

impl<T, F: InterruptFlag> IrqLock<T, F> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
            _flag: PhantomData,
        }
    }

    /// Mask interrupts, then lock.
    pub fn lock(&self) -> IrqLockGuard<'_, T, F> {
        let irq = DisableInterrupts::new();
        IrqLockGuard {
            guard: self.inner.lock(),
            _irq: irq,
        }
    }

    /// Lock for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}

impl<T, F: InterruptFlag> Deref for IrqLockGuard<'_, T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T, F: InterruptFlag> DerefMut for IrqLockGuard<'_, T, F> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T: fmt::Debug, F> fmt::Debug for IrqLock<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(value) => f.debug_struct("IrqLock").field("value", &*value).finish(),
            None => f.write_str("IrqLock { <locked> }"),
        }
    }
}
