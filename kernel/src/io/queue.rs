/*
 * Bounded Byte Queue
 *
 * Fixed-capacity FIFO of bytes backed by an inline array.
 *
 * Design:
 * - head: next slot to read, tail: next slot to write (both mod C)
 * - count tracks occupancy, so full and empty are distinguishable
 * - a full queue rejects enqueue without touching any field
 *
 * No synchronization here. Every queue shared with an interrupt handler
 * lives inside an `IrqLock` and is only touched through its guard.
 */

use core::fmt;

/// Returned by `enqueue` when the queue already holds `C` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull;

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("queue full")
    }
}

/// Circular byte queue holding at most `C` bytes.
#[derive(Clone)]
pub struct BoundedQueue<const C: usize> {
    slots: [u8; C],
    head: usize,
    tail: usize,
    count: usize,
}

impl<const C: usize> BoundedQueue<C> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            slots: [0; C],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Append `byte` at the tail.
    ///
    /// Fails with `QueueFull` and leaves the queue untouched when it already
    /// holds `C` bytes.
    pub fn enqueue(&mut self, byte: u8) -> Result<(), QueueFull> {
        if self.count == C {
            return Err(QueueFull);
        }
        self.slots[self.tail] = byte;
        self.tail = (self.tail + 1) % C;
        self.count += 1;
        Ok(())
    }

    /// Remove and return the byte at the head, oldest first.
    pub fn dequeue(&mut self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }
        let byte = self.slots[self.head];
        self.head = (self.head + 1) % C;
        self.count -= 1;
        Some(byte)
    }

    /// Number of bytes currently queued.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        C
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == C
    }

    /// Read and write cursors, for invariant checks.
    #[cfg(test)]
    fn cursors(&self) -> (usize, usize) {
        (self.head, self.tail)
    }
}

impl<const C: usize> Default for BoundedQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> fmt::Debug for BoundedQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("capacity", &C)
            .field("count", &self.count)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish()
    }
}
