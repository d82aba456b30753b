/*
 * Port I/O (PIO)
 *
 * Register access for devices that sit on the x86 I/O port bus. Drivers
 * are written against the `Io` trait, so the same driver code runs on real
 * ports (`Pio`, IN/OUT instructions) or on a simulated register file.
 */

#[cfg(target_arch = "x86_64")]
use core::arch::asm;
use core::marker::PhantomData;

/// I/O interface trait
pub trait Io {
    /// The value type used for I/O operations.
    type Value: Copy + PartialEq + core::ops::BitAnd<Output = Self::Value>;

    /// Reads the value from the I/O interface.
    fn read(&self) -> Self::Value;

    /// Writes the value to the I/O interface.
    fn write(&mut self, value: Self::Value);
}

/// Wrapper for an I/O interface providing read-only access.
pub struct ReadOnly<I> {
    inner: I,
}

impl<I> ReadOnly<I> {
    /// Creates a new `ReadOnly` wrapper instance.
    pub const fn new(inner: I) -> ReadOnly<I> {
        ReadOnly { inner }
    }
}

impl<I: Io> ReadOnly<I> {
    /// Reads the value from the I/O interface.
    #[inline(always)]
    pub fn read(&self) -> I::Value {
        self.inner.read()
    }
}

/// Generic PIO
#[derive(Copy, Clone)]
pub struct Pio<T> {
    port: u16,
    value: PhantomData<T>,
}

impl<T> Pio<T> {
    /// Create a new PIO instance for the given port number.
    pub const fn new(port: u16) -> Self {
        Pio::<T> {
            port,
            value: PhantomData,
        }
    }
}

/// Read/Write for byte PIO
#[cfg(target_arch = "x86_64")]
impl Io for Pio<u8> {
    type Value = u8;

    #[inline(always)]
    fn read(&self) -> u8 {
        let value: u8;
        unsafe {
            asm!("in al, dx", in("dx") self.port, out("al") value, options(nostack, nomem, preserves_flags));
        }
        value
    }

    #[inline(always)]
    fn write(&mut self, value: u8) {
        unsafe {
            asm!("out dx, al", in("dx") self.port, in("al") value, options(nostack, nomem, preserves_flags));
        }
    }
}
