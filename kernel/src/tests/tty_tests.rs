/*
 * Serial Line Tests
 *
 * Queue and interrupt protocol of a single line, driven through the
 * registry against the simulated UART:
 * - transmit interrupt lifecycle (armed by write/echo, disarmed when idle)
 * - echo gating and echo-before-output priority
 * - receive overrun accounting
 * - blocking write and read with a concurrent interrupt source
 */

use std::sync::atomic::{AtomicBool, Ordering};

use super::{interrupt_loop, line, registry, service};
use crate::config::{ECHO_CONTROL, QUEUE_CAPACITY, TTY0, TTY1};
use crate::drivers::serial::IntEnFlags;

const DEV: i32 = TTY0 as i32;

/// A short write goes out and the transmit interrupt is switched back off
#[test]
fn short_write_is_transmitted_then_tx_interrupt_disarmed() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);

    assert_eq!(reg.write(DEV, b"hi!\n"), 4);
    assert_eq!(uart.int_en(), IntEnFlags::RECEIVED | IntEnFlags::SENT);

    service(&reg, TTY0);

    assert_eq!(uart.transmitted(), b"hi!\n");
    assert_eq!(uart.int_en(), IntEnFlags::RECEIVED);
    assert_eq!(reg.snapshot(DEV).unwrap().tx_pending, 0);
}

#[test]
fn write_returns_before_bytes_reach_the_wire() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    uart.set_transmitter_busy(true);

    assert_eq!(reg.write(DEV, b"abc"), 3);
    assert!(uart.transmitted().is_empty());
    assert_eq!(reg.snapshot(DEV).unwrap().tx_pending, 3);

    uart.set_transmitter_busy(false);
    service(&reg, TTY0);
    assert_eq!(uart.transmitted(), b"abc");
}

#[test]
fn received_bytes_are_echoed_when_echo_is_on() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);

    uart.inject(b"ab");
    service(&reg, TTY0);

    assert_eq!(uart.transmitted(), b"ab");
    assert_eq!(uart.int_en(), IntEnFlags::RECEIVED);

    let mut buf = [0u8; 2];
    assert_eq!(reg.read(DEV, &mut buf), 2);
    assert_eq!(&buf, b"ab");
}

#[test]
fn nothing_is_echoed_when_echo_is_off() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    assert_eq!(reg.control(DEV, ECHO_CONTROL, 0), 0);

    uart.inject(b"ab");
    service(&reg, TTY0);

    assert!(uart.transmitted().is_empty());
    let snap = reg.snapshot(DEV).unwrap();
    assert_eq!((snap.rx_pending, snap.echo_pending), (2, 0));
    assert_eq!(snap.int_en, IntEnFlags::RECEIVED);
}

/// Only the first byte into an empty ebuf arms the transmit interrupt;
/// pending echoes go out once the transmitter frees up
#[test]
fn echo_waits_for_a_busy_transmitter() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    uart.set_transmitter_busy(true);

    uart.inject(b"xyz");
    service(&reg, TTY0);

    let snap = reg.snapshot(DEV).unwrap();
    assert_eq!((snap.rx_pending, snap.echo_pending), (3, 3));
    assert_eq!(snap.int_en, IntEnFlags::RECEIVED | IntEnFlags::SENT);
    assert!(uart.transmitted().is_empty());

    uart.set_transmitter_busy(false);
    service(&reg, TTY0);

    assert_eq!(uart.transmitted(), b"xyz");
    assert_eq!(reg.snapshot(DEV).unwrap().echo_pending, 0);
    assert_eq!(uart.int_en(), IntEnFlags::RECEIVED);
}

#[test]
fn echoes_go_out_before_queued_output() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    uart.set_transmitter_busy(true);

    assert_eq!(reg.write(DEV, b"abc"), 3);
    uart.inject(b"z");
    service(&reg, TTY0);

    uart.set_transmitter_busy(false);
    service(&reg, TTY0);

    assert_eq!(uart.transmitted(), b"zabc");
}

/// Every transmit service drops and re-raises THRI before touching the
/// data register, including the one that finds nothing left to send
#[test]
fn transmit_service_rearms_thri_first() {
    let reg = registry();
    let (uart, irq) = line(&reg, TTY0);
    let rx = IntEnFlags::RECEIVED.bits();
    let rx_tx = (IntEnFlags::RECEIVED | IntEnFlags::SENT).bits();

    assert_eq!(reg.write(DEV, b"a"), 1);
    uart.take_writes();

    reg.handle_irq(irq);
    assert_eq!(uart.take_writes(), vec![(1, rx), (1, rx_tx), (0, b'a')]);

    reg.handle_irq(irq);
    assert_eq!(uart.take_writes(), vec![(1, rx), (1, rx_tx), (1, rx)]);
    assert!(!uart.irq_pending());
}

/// A stray transmit interrupt on an idle line only disarms it
#[test]
fn idle_transmit_interrupt_leaves_input_alone() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    reg.control(DEV, ECHO_CONTROL, 0);

    uart.inject(b"k");
    service(&reg, TTY0);
    assert_eq!(reg.snapshot(DEV).unwrap().rx_pending, 1);

    uart.write_reg(1, (IntEnFlags::RECEIVED | IntEnFlags::SENT).bits());
    assert_eq!(service(&reg, TTY0), 1);

    assert_eq!(reg.snapshot(DEV).unwrap().rx_pending, 1);
    assert_eq!(uart.int_en(), IntEnFlags::RECEIVED);
    assert!(uart.transmitted().is_empty());
}

#[test]
fn receive_overrun_drops_and_counts_excess_bytes() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    reg.control(DEV, ECHO_CONTROL, 0);

    uart.inject(b"12345678");
    service(&reg, TTY0);

    let snap = reg.snapshot(DEV).unwrap();
    assert_eq!(snap.rx_pending, QUEUE_CAPACITY);
    assert_eq!(snap.stats.rx_dropped, 2);
    assert_eq!(uart.rx_waiting(), 0);

    let mut buf = [0u8; QUEUE_CAPACITY];
    assert_eq!(reg.read(DEV, &mut buf), QUEUE_CAPACITY as isize);
    assert_eq!(&buf, b"123456");
}

#[test]
fn echo_overrun_is_counted_separately() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    uart.set_transmitter_busy(true);

    uart.inject(b"abcdefgh");
    service(&reg, TTY0);

    let snap = reg.snapshot(DEV).unwrap();
    assert_eq!((snap.rx_pending, snap.echo_pending), (6, 6));
    assert_eq!(snap.stats.rx_dropped, 2);
    assert_eq!(snap.stats.echo_dropped, 2);

    uart.set_transmitter_busy(false);
    service(&reg, TTY0);
    assert_eq!(uart.transmitted(), b"abcdef");
}

/// A write longer than tbuf blocks until the interrupt handler makes room,
/// while input keeps arriving on the same line
#[test]
fn long_write_completes_with_concurrent_input() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);
    reg.control(DEV, ECHO_CONTROL, 0);

    let data: Vec<u8> = (0..80u8).map(|i| b'a' + i % 26).collect();
    let stop = AtomicBool::new(false);

    std::thread::scope(|s| {
        s.spawn(|| {
            interrupt_loop(&reg, TTY0, &stop, |tick| {
                if tick < 5 {
                    uart.inject(&[b'0' + tick as u8]);
                }
            })
        });
        assert_eq!(reg.write(DEV, &data), data.len() as isize);
        stop.store(true, Ordering::Release);
    });

    assert_eq!(uart.transmitted(), data);
    let snap = reg.snapshot(DEV).unwrap();
    assert_eq!(snap.rx_pending, 5);
    assert_eq!(snap.tx_pending, 0);
    assert_eq!(snap.int_en, IntEnFlags::RECEIVED);

    let mut buf = [0u8; 5];
    assert_eq!(reg.read(DEV, &mut buf), 5);
    assert_eq!(&buf, b"01234");
}

/// read spins until every requested byte has arrived
#[test]
fn blocking_read_collects_every_byte() {
    let reg = registry();
    let (uart, _) = line(&reg, TTY0);

    let data = b"0123456789";
    let stop = AtomicBool::new(false);
    let mut buf = [0u8; 10];

    std::thread::scope(|s| {
        s.spawn(|| {
            let mut next = 0;
            interrupt_loop(&reg, TTY0, &stop, |_| {
                let room = reg.snapshot(DEV).unwrap().rx_pending < QUEUE_CAPACITY;
                if next < data.len() && uart.rx_waiting() == 0 && room {
                    uart.inject(&data[next..next + 1]);
                    next += 1;
                }
            })
        });
        assert_eq!(reg.read(DEV, &mut buf), 10);
        stop.store(true, Ordering::Release);
    });

    assert_eq!(&buf, data);
    assert_eq!(uart.transmitted(), data);
    assert_eq!(reg.snapshot(DEV).unwrap().rx_pending, 0);
}

#[test]
fn lines_do_not_share_state() {
    let reg = registry();
    let (com1, _) = line(&reg, TTY0);
    let (com2, _) = line(&reg, TTY1);

    reg.control(TTY1 as i32, ECHO_CONTROL, 0);
    assert_eq!(reg.write(DEV, b"one"), 3);
    assert_eq!(reg.write(TTY1 as i32, b"two"), 3);
    com2.inject(b"in");

    service(&reg, TTY0);
    service(&reg, TTY1);

    assert_eq!(com1.transmitted(), b"one");
    assert_eq!(com2.transmitted(), b"two");
    assert_eq!(reg.snapshot(DEV).unwrap().rx_pending, 0);
    assert_eq!(reg.snapshot(TTY1 as i32).unwrap().rx_pending, 2);
    assert!(reg.snapshot(DEV).unwrap().echo);
    assert!(!reg.snapshot(TTY1 as i32).unwrap().echo);
}
