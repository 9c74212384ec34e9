// This file wraps what's found on the bus into plain descriptors which other code can hold
// on to, show in a list, and later open a session from. Nothing outside this crate needs
// to know how the bus was polled to get them.
use crate::device::base::{BusDevice, BusHandle, UsbBus, UsbIdentity};
use crate::device::libusb::device::LibUsbBus;
use crate::device::transport;
use crate::error::{TransportError, UsbError};
use log::{debug, info};
use smc_types::{Product, VID_POLOLU};
use std::fmt::{Debug, Formatter};

/// Size of the buffer serial number strings are read into.
pub const SERIAL_BUFFER_SIZE: usize = 100;

/// A device found during enumeration, or a placeholder entry standing in for one.
pub struct DeviceDescriptor<B: UsbBus = LibUsbBus> {
    device: Option<B::Device>,
    text: String,
    serial_number: String,
    product_id: u16,
}

impl<B: UsbBus> DeviceDescriptor<B> {
    /// Takes ownership of `device`, its reference is released when the descriptor drops.
    pub(crate) fn new(device: B::Device, serial_number: String, product_id: u16) -> Self {
        Self {
            device: Some(device),
            text: format!("#{}", serial_number),
            serial_number,
            product_id,
        }
    }

    /// An entry with no device behind it, such as "Disconnected" in a device list.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            device: None,
            text: text.into(),
            serial_number: String::new(),
            product_id: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn product_id(&self) -> u16 {
        self.product_id
    }

    pub fn product(&self) -> Option<Product> {
        Product::from_product_id(self.product_id)
    }

    pub fn is_placeholder(&self) -> bool {
        self.device.is_none()
    }

    /// True if both descriptors refer to the same native device. Two placeholders
    /// count as the same.
    pub fn is_same_device_as(&self, other: &DeviceDescriptor<B>) -> bool {
        match (&self.device, &other.device) {
            (Some(ours), Some(theirs)) => ours.is_same(theirs),
            (None, None) => true,
            _ => false,
        }
    }

    pub(crate) fn device(&self) -> Option<&B::Device> {
        self.device.as_ref()
    }
}

impl<B: UsbBus> Clone for DeviceDescriptor<B> {
    fn clone(&self) -> Self {
        Self {
            device: self.device.as_ref().map(BusDevice::retain),
            text: self.text.clone(),
            serial_number: self.serial_number.clone(),
            product_id: self.product_id,
        }
    }
}

impl<B: UsbBus> Debug for DeviceDescriptor<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceDescriptor")
            .field("device", &self.device)
            .field("text", &self.text)
            .field("serial_number", &self.serial_number)
            .field("product_id", &format_args!("{:#06x}", self.product_id))
            .finish()
    }
}

/// Reads the serial number string through an open handle. Index 0 means the
/// device has no serial string, so nothing is read.
pub(crate) fn read_serial_number<H: BusHandle>(
    handle: &H,
    index: u8,
) -> Result<String, TransportError> {
    if index == 0 {
        return Ok(String::new());
    }

    let mut buffer = [0u8; SERIAL_BUFFER_SIZE];
    let length = handle.read_string_ascii(index, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer[..length]).into_owned())
}

pub(crate) fn serial_read_failed(identity: UsbIdentity) -> String {
    format!(
        "Error getting serial number string from device (pid={:x}, vid={:x}).",
        identity.product_id, identity.vendor_id
    )
}

/// Lists every device on `bus` with a matching vendor id and an accepted product id,
/// in bus order.
pub fn enumerate<B: UsbBus>(
    bus: &B,
    vendor_id: u16,
    product_ids: &[u16],
) -> Result<Vec<DeviceDescriptor<B>>, UsbError> {
    let devices = bus
        .devices()
        .map_err(|e| UsbError::enumerate("Error from libusb_get_device_list.", e))?;
    let count = devices.len();
    debug!("Checking {} USB devices", count);

    let mut found = Vec::new();
    for (i, device) in devices.into_iter().enumerate() {
        let identity = device
            .identity()
            .map_err(|e| UsbError::enumerate("Failed to get device descriptor", e))?;

        if identity.vendor_id != vendor_id || !product_ids.contains(&identity.product_id) {
            continue;
        }

        let handle = device.open().map_err(|e| {
            UsbError::enumerate(
                format!(
                    "Error connecting to device to get serial number ({} of {}, {:?}).",
                    i + 1,
                    count,
                    device
                ),
                e,
            )
        })?;

        let serial_number = read_serial_number(&handle, identity.serial_number_index)
            .map_err(|e| UsbError::enumerate(serial_read_failed(identity), e))?;
        drop(handle);

        debug!(
            "Found device {:04x}:{:04x} with serial {}",
            identity.vendor_id, identity.product_id, serial_number
        );
        found.push(DeviceDescriptor::new(
            device,
            serial_number,
            identity.product_id,
        ));
    }

    Ok(found)
}

/// Lists every connected Simple Motor Controller G2, using the shared libusb context.
pub fn find_devices() -> Result<Vec<DeviceDescriptor>, UsbError> {
    let bus = transport()?;
    let devices = enumerate(&bus, VID_POLOLU, &Product::all_product_ids())?;
    info!("Found {} motor controller(s)", devices.len());
    Ok(devices)
}

/// Hotplug notifications aren't available, callers need to poll [`find_devices`].
pub fn supports_notify() -> bool {
    false
}

pub fn register_notifications() -> Result<(), UsbError> {
    Err(UsbError::HotplugUnsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{MockBus, MockDeviceConfig};

    const VID: u16 = 0x1ffb;
    const OTHER_VID: u16 = 0x1234;

    fn three_devices() -> MockBus {
        MockBus::new(vec![
            MockDeviceConfig::new(VID, 0xa3, "11111111"),
            MockDeviceConfig::new(VID, 0xa5, "22222222"),
            MockDeviceConfig::new(OTHER_VID, 0xa3, "33333333"),
        ])
    }

    #[test]
    fn only_matching_devices_are_listed() {
        let bus = three_devices();
        let devices = enumerate(&bus, VID, &[0xa3]).unwrap();

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].serial_number(), "11111111");
        assert_eq!(devices[0].product_id(), 0xa3);
        assert_eq!(devices[0].product(), Some(Product::Smc18v15));

        // Only the kept device still holds a reference, and no handles are left open.
        assert_eq!(bus.references(0), 1);
        assert_eq!(bus.references(1), 0);
        assert_eq!(bus.references(2), 0);
        assert_eq!(bus.total_open_handles(), 0);
    }

    #[test]
    fn devices_keep_bus_order() {
        let bus = three_devices();
        let devices = enumerate(&bus, VID, &[0xa5, 0xa3]).unwrap();
        let serials: Vec<&str> = devices.iter().map(|d| d.serial_number()).collect();
        assert_eq!(serials, ["11111111", "22222222"]);
    }

    #[test]
    fn references_are_released_once() {
        let bus = three_devices();
        let devices = enumerate(&bus, VID, &[0xa3, 0xa5]).unwrap();
        assert_eq!(bus.total_references(), 2);

        drop(devices);
        assert_eq!(bus.total_references(), 0);
        assert!(!bus.over_released());
    }

    #[test]
    fn label_is_serial_with_a_hash() {
        let bus = three_devices();
        let mut devices = enumerate(&bus, VID, &[0xa5]).unwrap();
        assert_eq!(devices[0].text(), "#22222222");

        devices[0].set_text("Left wheel");
        assert_eq!(devices[0].text(), "Left wheel");
        assert_eq!(devices[0].serial_number(), "22222222");
    }

    #[test]
    fn list_failure_is_reported() {
        let bus = MockBus::failing(-11);
        let error = enumerate(&bus, VID, &[0xa3]).unwrap_err();
        assert_eq!(error.to_string(), "Error from libusb_get_device_list.");
        assert_eq!(error.category(), Some(TransportError::NoMem));
    }

    #[test]
    fn descriptor_failure_aborts_and_releases() {
        let bus = MockBus::new(vec![
            MockDeviceConfig::new(VID, 0xa3, "11111111"),
            MockDeviceConfig::new(VID, 0xa5, "22222222").descriptor_status(-1),
        ]);

        let error = enumerate(&bus, VID, &[0xa3, 0xa5]).unwrap_err();
        assert_eq!(error.to_string(), "Failed to get device descriptor");
        assert_eq!(error.category(), Some(TransportError::Io));
        assert_eq!(bus.total_references(), 0);
        assert!(!bus.over_released());
    }

    #[test]
    fn open_failure_names_the_position() {
        let bus = MockBus::new(vec![
            MockDeviceConfig::new(VID, 0xa3, "11111111"),
            MockDeviceConfig::new(VID, 0xa5, "22222222").open_status(-3),
            MockDeviceConfig::new(VID, 0xa7, "33333333"),
        ]);

        let error = enumerate(&bus, VID, &[0xa3, 0xa5, 0xa7]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Error connecting to device to get serial number (2 of 3, MockDevice(1))."
        );
        assert_eq!(error.category(), Some(TransportError::Access));

        assert_eq!(bus.total_references(), 0);
        assert_eq!(bus.total_open_handles(), 0);
        assert!(!bus.over_released());
    }

    #[test]
    fn serial_failure_names_the_ids() {
        let bus = MockBus::new(vec![
            MockDeviceConfig::new(VID, 0xa9, "11111111").serial_status(-9),
        ]);

        let error = enumerate(&bus, VID, &[0xa9]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Error getting serial number string from device (pid=a9, vid=1ffb)."
        );
        assert_eq!(error.category(), Some(TransportError::Pipe));
        assert_eq!(bus.total_references(), 0);
        assert_eq!(bus.total_open_handles(), 0);
    }

    #[test]
    fn long_serials_are_cut_to_the_buffer() {
        let serial = "9".repeat(SERIAL_BUFFER_SIZE + 20);
        let bus = MockBus::new(vec![MockDeviceConfig::new(VID, 0xa3, &serial)]);

        let devices = enumerate(&bus, VID, &[0xa3]).unwrap();
        assert_eq!(devices[0].serial_number().len(), SERIAL_BUFFER_SIZE);
    }

    #[test]
    fn missing_serial_string_is_not_read() {
        let bus = MockBus::new(vec![
            MockDeviceConfig::new(VID, 0xa5, "unused").without_serial(),
        ]);

        let devices = enumerate(&bus, VID, &[0xa5]).unwrap();
        assert_eq!(devices[0].serial_number(), "");
        assert_eq!(devices[0].text(), "#");
        assert_eq!(bus.string_reads(), 0);
    }

    #[test]
    fn clones_retain_and_compare_equal() {
        let bus = three_devices();
        let devices = enumerate(&bus, VID, &[0xa3, 0xa5]).unwrap();

        let copy = devices[0].clone();
        assert_eq!(bus.references(0), 2);
        assert!(copy.is_same_device_as(&devices[0]));
        assert!(!copy.is_same_device_as(&devices[1]));

        drop(copy);
        assert_eq!(bus.references(0), 1);
    }

    #[test]
    fn placeholders() {
        let bus = three_devices();
        let devices = enumerate(&bus, VID, &[0xa3]).unwrap();

        let first = DeviceDescriptor::<MockBus>::placeholder("Disconnected");
        let second = DeviceDescriptor::<MockBus>::placeholder("None");
        assert!(first.is_placeholder());
        assert_eq!(first.text(), "Disconnected");
        assert_eq!(first.serial_number(), "");
        assert_eq!(first.product(), None);
        assert!(first.is_same_device_as(&second));
        assert!(!first.is_same_device_as(&devices[0]));
    }

    #[test]
    fn hotplug_is_unsupported() {
        assert!(!supports_notify());
        assert!(matches!(
            register_notifications(),
            Err(UsbError::HotplugUnsupported)
        ));
    }
}
