/*
 * Serial Line Interrupt Handler
 *
 * Runs on a UART interrupt for one line. The PIC is acknowledged first so
 * other interrupt sources are not held off while the line is serviced.
 * The handler never looks at the UART's IIR: it polls LSR and services
 * whatever is ready, receive first, then transmit.
 */

use crate::arch::{InterruptController, Platform};
use crate::drivers::serial::LineStsFlags;
use crate::io::Io;

use super::{LineState, TtyLine};

impl<T: Io<Value = u8>> LineState<T> {
    /// Move the received byte into rbuf and, when echoing, into ebuf.
    ///
    /// Full queues drop the byte. The first byte to land in an empty ebuf
    /// turns the transmit interrupt on so the echo goes out.
    fn on_receive(&mut self) {
        let byte = self.port.receive();

        if self.rbuf.enqueue(byte).is_err() {
            self.stats.rx_dropped = self.stats.rx_dropped.wrapping_add(1);
            log::trace!("rx overrun at 0x{:03x}, dropped 0x{:02x}", self.port.base(), byte);
        }

        if self.echo {
            if self.ebuf.enqueue(byte).is_err() {
                self.stats.echo_dropped = self.stats.echo_dropped.wrapping_add(1);
            }
            if self.ebuf.count() == 1 {
                self.port.set_transmit_interrupt(true);
            }
        }
    }

    /// Send one byte, echoes before application output. With nothing left
    /// to send, switch the transmit interrupt off; this is the only place
    /// that does.
    fn on_transmit_ready(&mut self) {
        self.port.kick_transmitter();

        if let Some(byte) = self.ebuf.dequeue() {
            self.port.transmit(byte);
        } else if let Some(byte) = self.tbuf.dequeue() {
            self.port.transmit(byte);
        } else {
            self.port.set_transmit_interrupt(false);
        }
    }

    /// Service both conditions from a single LSR sample.
    fn service(&mut self) {
        let lsr = self.port.line_sts();

        if lsr.contains(LineStsFlags::INPUT_FULL) {
            self.on_receive();
        }
        if lsr.contains(LineStsFlags::OUTPUT_EMPTY) {
            self.on_transmit_ready();
        }
    }
}

impl<P: Platform> TtyLine<P> {
    /// Interrupt entry for this line, raised on `irq`.
    pub fn handle_interrupt(&self, platform: &P, irq: u8) {
        platform.pic().end_of_interrupt(irq);

        let mut guard = self.state.lock();
        match guard.as_mut() {
            Some(line) => line.service(),
            None => log::warn!("IRQ {} on an uninitialized line", irq),
        }
    }
}
