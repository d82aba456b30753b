use core::convert::TryInto;

use bitflags::bitflags;

#[cfg(target_arch = "x86_64")]
use crate::io::Pio;
use crate::io::{Io, ReadOnly};

bitflags! {
    /// Interrupt enable flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntEnFlags: u8 {
        const RECEIVED = 1;
        const SENT = 1 << 1;
        const ERRORED = 1 << 2;
        const STATUS_CHANGE = 1 << 3;
        // 4 to 7 are unused
    }
}

bitflags! {
    /// Line status flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStsFlags: u8 {
        const INPUT_FULL = 1;
        // 1 to 4 unknown
        const OUTPUT_EMPTY = 1 << 5;
        // 6 and 7 unknown
    }
}

/// Register offsets from the UART base port.
const DATA: u16 = 0;
const INT_EN: u16 = 1;
const FIFO_CTRL: u16 = 2;
const LINE_CTRL: u16 = 3;
const MODEM_CTRL: u16 = 4;
const LINE_STS: u16 = 5;

/// Serial port representation.
pub struct SerialPort<T: Io> {
    base: u16,
    data: T,               // Data register, read to receive, write to send
    int_en: T,             // Interrupt enable
    fifo_ctrl: T,          // FIFO control
    line_ctrl: T,          // Line control
    modem_ctrl: T,         // Modem control
    line_sts: ReadOnly<T>, // Line status
}

#[cfg(target_arch = "x86_64")]
impl SerialPort<Pio<u8>> {
    /// Creates a serial port on the PIO bus at `base`.
    pub const fn new(base: u16) -> SerialPort<Pio<u8>> {
        SerialPort {
            base,
            data: Pio::new(base + DATA),
            int_en: Pio::new(base + INT_EN),
            fifo_ctrl: Pio::new(base + FIFO_CTRL),
            line_ctrl: Pio::new(base + LINE_CTRL),
            modem_ctrl: Pio::new(base + MODEM_CTRL),
            line_sts: ReadOnly::new(Pio::new(base + LINE_STS)),
        }
    }
}

impl<T: Io> SerialPort<T> {
    /// Creates a serial port at `base`, obtaining each register handle from
    /// `port(addr)`.
    pub fn with_ports(base: u16, mut port: impl FnMut(u16) -> T) -> SerialPort<T> {
        SerialPort {
            base,
            data: port(base + DATA),
            int_en: port(base + INT_EN),
            fifo_ctrl: port(base + FIFO_CTRL),
            line_ctrl: port(base + LINE_CTRL),
            modem_ctrl: port(base + MODEM_CTRL),
            line_sts: ReadOnly::new(port(base + LINE_STS)),
        }
    }

    pub fn base(&self) -> u16 {
        self.base
    }
}

impl<T: Io> SerialPort<T>
where
    T::Value: From<u8> + TryInto<u8>,
{
    /// Programs 38400 8N1 with FIFOs, raises OUT2 so the UART interrupt line
    /// reaches the PIC, and leaves only the receive interrupt enabled.
    pub fn init(&mut self) {
        self.int_en.write(0x00.into());
        self.line_ctrl.write(0x80.into()); // DLAB on
        self.data.write(0x03.into()); // divisor low
        self.int_en.write(0x00.into()); // divisor high
        self.line_ctrl.write(0x03.into()); // DLAB off, 8N1
        self.fifo_ctrl.write(0xC7.into());
        self.modem_ctrl.write(0x0B.into()); // DTR | RTS | OUT2
        self.set_int_en(IntEnFlags::RECEIVED);
    }

    /// Retrieves the line status flags.
    pub fn line_sts(&self) -> LineStsFlags {
        LineStsFlags::from_bits_truncate(
            (self.line_sts.read() & 0xFF.into())
                .try_into()
                .unwrap_or(0),
        )
    }

    /// Reads the received byte. Reading also acknowledges the receive
    /// interrupt on the device.
    pub fn receive(&mut self) -> u8 {
        (self.data.read() & 0xFF.into()).try_into().unwrap_or(0)
    }

    /// Loads `data` into the transmit register without waiting. Only valid
    /// when `OUTPUT_EMPTY` was observed.
    pub fn transmit(&mut self, data: u8) {
        self.data.write(data.into())
    }

    /// Current interrupt enable register.
    pub fn int_en(&self) -> IntEnFlags {
        IntEnFlags::from_bits_truncate(
            (self.int_en.read() & 0xFF.into())
                .try_into()
                .unwrap_or(0),
        )
    }

    pub fn set_int_en(&mut self, flags: IntEnFlags) {
        self.int_en.write(flags.bits().into());
    }

    /// Turns the transmit interrupt on or off. The receive interrupt stays on.
    pub fn set_transmit_interrupt(&mut self, enabled: bool) {
        let mut flags = IntEnFlags::RECEIVED;
        flags.set(IntEnFlags::SENT, enabled);
        self.set_int_en(flags);
    }

    /// Drops and re-raises the transmit interrupt enable.
    ///
    /// Some virtual UARTs (VMware) only raise a new transmit interrupt on a
    /// 0 -> 1 edge of IER.THRI, so a plain "enable" while already enabled is
    /// not enough to restart output.
    pub fn kick_transmitter(&mut self) {
        self.set_int_en(IntEnFlags::RECEIVED);
        self.set_int_en(IntEnFlags::RECEIVED | IntEnFlags::SENT);
    }

    /// Sends a byte of data through the serial port, waiting for the
    /// transmitter first.
    pub fn send(&mut self, data: u8) {
        while !self.line_sts().contains(LineStsFlags::OUTPUT_EMPTY) {
            core::hint::spin_loop();
        }
        self.data.write(data.into())
    }

    /// Polled write of a console byte, `\n` going out as `\r\n`.
    pub fn write(&mut self, b: u8) {
        if b == b'\n' {
            self.send(b'\r');
        }
        self.send(b)
    }
}
