pub use rusb;
pub mod device;
pub mod devices;
pub mod error;
pub mod session;

pub use device::base::{BusDevice, BusHandle, UsbBus, UsbIdentity};
pub use device::libusb::device::LibUsbBus;
pub use device::{invalidate_transport, transport, TransportContext};
pub use devices::{
    enumerate, find_devices, register_notifications, supports_notify, DeviceDescriptor,
};
pub use error::{guard, guard_with, translate, TransportError, UsbError};
pub use session::DeviceSession;
