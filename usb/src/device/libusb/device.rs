use crate::device::base::{check_transfer_length, BusDevice, BusHandle, UsbBus, UsbIdentity};
use crate::error::TransportError;
use rusb::{Context, Device, DeviceDescriptor, DeviceHandle, UsbContext};
use std::time::Duration;

const ENDPOINT_IN: u8 = 0x80;

/// The bus as seen through a libusb context.
#[derive(Clone, Debug)]
pub struct LibUsbBus {
    context: Context,
}

impl LibUsbBus {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            context: Context::new()?,
        })
    }
}

impl UsbBus for LibUsbBus {
    type Device = LibUsbDevice;
    type Handle = LibUsbHandle;

    fn devices(&self) -> Result<Vec<LibUsbDevice>, TransportError> {
        // Every Device handed out by the list holds its own reference, the list's
        // references are dropped along with it at the end of this function.
        let list = self.context.devices()?;
        Ok(list.iter().map(|device| LibUsbDevice { device }).collect())
    }
}

#[derive(Debug)]
pub struct LibUsbDevice {
    device: Device<Context>,
}

impl BusDevice for LibUsbDevice {
    type Handle = LibUsbHandle;

    fn identity(&self) -> Result<UsbIdentity, TransportError> {
        Ok(identity(&self.device.device_descriptor()?))
    }

    fn retain(&self) -> Self {
        Self {
            device: self.device.clone(),
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        self.device.as_raw() == other.device.as_raw()
    }

    fn open(&self) -> Result<LibUsbHandle, TransportError> {
        Ok(LibUsbHandle {
            handle: self.device.open()?,
        })
    }
}

pub struct LibUsbHandle {
    handle: DeviceHandle<Context>,
}

impl BusHandle for LibUsbHandle {
    fn identity(&self) -> Result<UsbIdentity, TransportError> {
        Ok(identity(&self.handle.device().device_descriptor()?))
    }

    fn read_string_ascii(&self, index: u8, buffer: &mut [u8]) -> Result<usize, TransportError> {
        let value = self.handle.read_string_descriptor_ascii(index)?;
        let bytes = value.as_bytes();
        let length = bytes.len().min(buffer.len());
        buffer[..length].copy_from_slice(&bytes[..length]);
        Ok(length)
    }

    fn control_transfer(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        // rusb would silently cut the length down to 16 bits.
        check_transfer_length(data.len())?;

        let transferred = if request_type & ENDPOINT_IN != 0 {
            self.handle
                .read_control(request_type, request, value, index, data, timeout)?
        } else {
            self.handle
                .write_control(request_type, request, value, index, data, timeout)?
        };
        Ok(transferred)
    }
}

fn identity(descriptor: &DeviceDescriptor) -> UsbIdentity {
    UsbIdentity {
        vendor_id: descriptor.vendor_id(),
        product_id: descriptor.product_id(),
        serial_number_index: descriptor.serial_number_string_index().unwrap_or(0),
    }
}
