/*
 * Input/Output System
 *
 * Port I/O primitives, the bounded byte queue, the device abstraction,
 * the device registry, and the device-independent dispatch surface
 * (`init_all`, `read`, `write`, `control`).
 */

pub mod device;
pub mod dispatch;
pub mod pio;
pub mod queue;
pub mod registry;

pub use pio::{Io, Pio, ReadOnly};
pub use queue::{BoundedQueue, QueueFull};

// Re-export device abstraction types
pub use device::{CharDevice, DeviceId, DeviceInfo, DeviceKind, InitError, IoError};
pub use registry::{DeviceEntry, DeviceRegistry};
