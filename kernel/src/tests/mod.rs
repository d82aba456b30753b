/*
 * Test Suite
 *
 * Host-side tests for the I/O layer, run against the simulated platform in
 * `sim`.
 *
 * - dispatch_tests: init_all, device bounds, configuration errors, IRQ routing
 * - tty_tests: queue/interrupt protocol, echo, write-behind, blocking read
 * - syscall_tests: trap decoding and dispatch
 *
 * Helpers here build an initialized registry, drive a line's pending
 * interrupts to quiescence, run an "interrupt thread" alongside a blocking
 * call, and capture log output.
 */


mod tty_tests;

use std::string::String;
use std::sync::Mutex;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use log::LevelFilter;

use crate::config::{COM1_IRQ, COM2_IRQ, TTY0, TTY1};
use crate::io::DeviceRegistry;
use crate::utils::logger;
use sim::{SimPlatform, SimUart};

static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn capture(line: &str) {
    CAPTURED
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(line.to_owned());
}

/// Route log output into the capture buffer (once per test binary).
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = logger::init(capture, LevelFilter::Trace);
    });
}

/// Whether any captured log line contains `needle`.
pub fn logged(needle: &str) -> bool {
    CAPTURED
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .any(|line| line.contains(needle))
}

/// Default registry on a fresh simulated PC, after `init_all`.
pub fn registry() -> DeviceRegistry<SimPlatform> {
    init_logging();
    let reg = DeviceRegistry::new(SimPlatform::default());
    reg.init_all();
    reg
}

/// Simulated UART and IRQ behind a serial device index.
pub fn line(reg: &DeviceRegistry<SimPlatform>, dev: usize) -> (&SimUart, u8) {
    match dev {
        TTY0 => (&*reg.platform().com1, COM1_IRQ),
        TTY1 => (&*reg.platform().com2, COM2_IRQ),
        _ => panic!("no simulated line for device {}", dev),
    }
}

/// Deliver interrupts for `dev` until its UART stops asserting one.
/// Returns how many were delivered.
pub fn service(reg: &DeviceRegistry<SimPlatform>, dev: usize) -> usize {
    let (uart, irq) = line(reg, dev);
    let mut delivered = 0;
    while uart.irq_pending() {
        reg.handle_irq(irq);
        delivered += 1;
        assert!(delivered < 10_000, "interrupt storm on device {}", dev);
    }
    delivered
}

/// Act as the interrupt source for `dev` until `stop` is set and the UART
/// is quiet. `tick` runs once per iteration, before the UART is polled.
pub fn interrupt_loop(
    reg: &DeviceRegistry<SimPlatform>,
    dev: usize,
    stop: &AtomicBool,
    mut tick: impl FnMut(u64),
) {
    let (uart, irq) = line(reg, dev);
    let mut iteration = 0;
    loop {
        tick(iteration);
        iteration += 1;
        if uart.irq_pending() {
            reg.handle_irq(irq);
        } else if stop.load(Ordering::Acquire) {
            break;
        } else {
            std::thread::yield_now();
        }
    }
}
