/*
 * Serial Line (TTY) Driver
 *
 * Interrupt-driven driver for a 16550 serial line. Each line owns three
 * bounded queues and an echo flag:
 *
 *  - rbuf: bytes received by the interrupt handler, waiting for `read`
 *  - tbuf: bytes queued by `write`, waiting for the transmitter
 *  - ebuf: received bytes waiting to be echoed back out
 *
 * System calls and the interrupt handler (see `interrupt`) are the only two
 * mutators. Both touch the line through the same `IrqLock`, held for a few
 * queue operations at a time. `read` and the second phase of `write` spin
 * between critical sections, calling `Platform::relax` with the lock
 * released and interrupts enabled.
 *
 * The transmit interrupt is enabled only while output may exist: `write`
 * and the first echoed byte turn it on, and the handler turns it off when
 * both ebuf and tbuf are empty.
 */

pub mod interrupt;

use crate::arch::{InterruptController, Platform};
use crate::config::{COM1_BASE, COM1_IRQ, COM2_BASE, COM2_IRQ, ECHO_CONTROL, QUEUE_CAPACITY};
use crate::drivers::serial::{IntEnFlags, SerialPort};
use crate::io::device::{DeviceInfo, InitError, IoError};
use crate::io::{BoundedQueue, Io};
use crate::sync::IrqLock;

type Queue = BoundedQueue<QUEUE_CAPACITY>;

/// The two UART identities the driver can arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialIrq {
    Com1,
    Com2,
}

impl SerialIrq {
    /// Hardware identity behind a base port, if it is one we know.
    pub const fn from_base(base: u16) -> Option<Self> {
        match base {
            COM1_BASE => Some(SerialIrq::Com1),
            COM2_BASE => Some(SerialIrq::Com2),
            _ => None,
        }
    }

    /// PIC input the UART is wired to.
    pub const fn irq(self) -> u8 {
        match self {
            SerialIrq::Com1 => COM1_IRQ,
            SerialIrq::Com2 => COM2_IRQ,
        }
    }
}

/// Bytes lost to full queues on the receive path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub rx_dropped: u32,
    pub echo_dropped: u32,
}

/// Point-in-time view of a line, taken under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSnapshot {
    pub rx_pending: usize,
    pub tx_pending: usize,
    pub echo_pending: usize,
    pub echo: bool,
    pub int_en: IntEnFlags,
    pub stats: LineStats,
}

/// Software state of one initialized line plus its UART registers.
pub struct LineState<T: Io> {
    rbuf: Queue,
    tbuf: Queue,
    ebuf: Queue,
    echo: bool,
    stats: LineStats,
    port: SerialPort<T>,
}

impl<T: Io<Value = u8>> LineState<T> {
    /// Empty queues, echo on.
    fn new(port: SerialPort<T>) -> Self {
        Self {
            rbuf: Queue::new(),
            tbuf: Queue::new(),
            ebuf: Queue::new(),
            echo: true,
            stats: LineStats::default(),
            port,
        }
    }

    fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            rx_pending: self.rbuf.count(),
            tx_pending: self.tbuf.count(),
            echo_pending: self.ebuf.count(),
            echo: self.echo,
            int_en: self.port.int_en(),
            stats: self.stats,
        }
    }
}

/// One serial line. Uninitialized until `init` succeeds.
pub struct TtyLine<P: Platform> {
    state: IrqLock<Option<LineState<P::Port>>, P::Cpu>,
}

impl<P: Platform> TtyLine<P> {
    pub const fn new() -> Self {
        Self {
            state: IrqLock::new(None),
        }
    }

    /// Run `f` on the line state inside a critical section.
    fn with_line<R>(&self, f: impl FnOnce(&mut LineState<P::Port>) -> R) -> Result<R, IoError> {
        self.state
            .with(|state| state.as_mut().map(f).ok_or(IoError::NotInitialized))
    }

    /// Arm the line's IRQ and bring up its UART with only receive
    /// interrupts enabled.
    ///
    /// A base port that is neither COM1 nor COM2 leaves the line
    /// uninitialized.
    pub fn init(&self, platform: &P, info: DeviceInfo) -> Result<(), InitError> {
        let irq = SerialIrq::from_base(info.base_port).ok_or(InitError::UnknownBasePort {
            dev: info.id,
            base: info.base_port,
        })?;

        let mut guard = self.state.lock();
        let pic = platform.pic();
        pic.enable_irq(irq.irq());

        let port = SerialPort::with_ports(info.base_port, |addr| platform.port(addr));
        let mut line = LineState::new(port);
        line.port.init();
        *guard = Some(line);
        drop(guard);

        log::info!(
            "tty{}: {:?} at 0x{:03x}, IRQ {} on vector 0x{:02x}",
            info.id,
            irq,
            info.base_port,
            irq.irq(),
            pic.vector(irq.irq())
        );
        Ok(())
    }

    /// Blocking read of exactly `buf.len()` bytes.
    ///
    /// Spins until every byte has arrived; there is no timeout and no
    /// short read.
    pub fn read(&self, platform: &P, buf: &mut [u8]) -> Result<usize, IoError> {
        self.with_line(|_| ())?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.with_line(|line| line.rbuf.dequeue())? {
                Some(byte) => {
                    buf[filled] = byte;
                    filled += 1;
                }
                None => platform.relax(),
            }
        }
        Ok(buf.len())
    }

    /// Queue every byte of `buf` for transmission.
    ///
    /// Fills tbuf as far as it goes without waiting, starts the transmitter,
    /// then spins for room for the rest. Returns once all bytes are queued,
    /// not once they are on the wire.
    pub fn write(&self, platform: &P, buf: &[u8]) -> Result<usize, IoError> {
        let mut sent = self.with_line(|line| {
            let queued = buf
                .iter()
                .take_while(|&&byte| line.tbuf.enqueue(byte).is_ok())
                .count();
            line.port.set_transmit_interrupt(true);
            queued
        })?;

        while sent < buf.len() {
            let queued = self.with_line(|line| {
                let ok = line.tbuf.enqueue(buf[sent]).is_ok();
                if ok {
                    line.port.kick_transmitter();
                }
                ok
            })?;
            if queued {
                sent += 1;
            } else {
                platform.relax();
            }
        }
        Ok(buf.len())
    }

    /// `ECHO_CONTROL` sets echo to `val != 0`; any other code is rejected.
    pub fn control(&self, code: u32, val: i32) -> Result<(), IoError> {
        if code != ECHO_CONTROL {
            return Err(IoError::InvalidControlCode);
        }
        self.with_line(|line| line.echo = val != 0)
    }

    pub fn snapshot(&self) -> Option<LineSnapshot> {
        self.with_line(|line| line.snapshot()).ok()
    }
}

impl<P: Platform> Default for TtyLine<P> {
    fn default() -> Self {
        Self::new()
    }
}
