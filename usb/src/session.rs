use crate::device::base::{check_transfer_length, BusDevice, BusHandle, UsbBus};
use crate::device::libusb::device::LibUsbBus;
use crate::devices::{read_serial_number, serial_read_failed, DeviceDescriptor};
use crate::error::{TransportError, UsbError};
use log::{debug, warn};
use std::time::Duration;

/// Every control transfer is given this long to complete.
pub const TIMEOUT: Duration = Duration::from_millis(5000);

/// An open connection to one device. The handle is closed by [`DeviceSession::close`]
/// or when the session is dropped.
pub struct DeviceSession<B: UsbBus = LibUsbBus> {
    device: B::Device,
    handle: Option<B::Handle>,
}

impl<B: UsbBus> DeviceSession<B> {
    pub fn open(descriptor: &DeviceDescriptor<B>) -> Result<Self, UsbError> {
        let device = descriptor.device().ok_or_else(|| {
            UsbError::session("Error connecting to device.", TransportError::InvalidParam)
        })?;

        let handle = device
            .open()
            .map_err(|e| UsbError::session("Error connecting to device.", e))?;
        debug!("Opened session to {}", descriptor.text());

        Ok(Self {
            device: device.retain(),
            handle: Some(handle),
        })
    }

    fn handle(&self) -> Result<&B::Handle, UsbError> {
        self.handle.as_ref().ok_or(UsbError::SessionClosed)
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Sends a control request, reading into or writing from `data` depending on the
    /// direction bit of `request_type`. Without a buffer the transfer has no data stage.
    /// Returns the number of bytes transferred.
    pub fn control_transfer(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: Option<&mut [u8]>,
    ) -> Result<usize, UsbError> {
        let handle = self.handle()?;

        let mut empty = [0u8; 0];
        let data = match data {
            Some(data) => data,
            None => &mut empty[..],
        };

        check_transfer_length(data.len())
            .and_then(|_| {
                handle.control_transfer(request_type, request, value, index, data, TIMEOUT)
            })
            .map_err(|e| {
                warn!(
                    "Control transfer {:#04x}/{:#04x} failed: {}",
                    request_type, request, e
                );
                UsbError::session("Control transfer failed.", e)
            })
    }

    /// Reads the serial number from the device. This isn't cached.
    pub fn serial_number(&self) -> Result<String, UsbError> {
        let handle = self.handle()?;
        let identity = handle
            .identity()
            .map_err(|e| UsbError::session("Failed to get device descriptor", e))?;
        read_serial_number(handle, identity.serial_number_index)
            .map_err(|e| UsbError::session(serial_read_failed(identity), e))
    }

    pub fn product_id(&self) -> Result<u16, UsbError> {
        let identity = self
            .handle()?
            .identity()
            .map_err(|e| UsbError::session("Failed to get device descriptor", e))?;
        Ok(identity.product_id)
    }

    pub fn is_same_device_as(&self, descriptor: &DeviceDescriptor<B>) -> bool {
        descriptor
            .device()
            .map(|device| device.is_same(&self.device))
            .unwrap_or(false)
    }

    /// Closes the handle. Closing an already closed session does nothing.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!("Closed device session");
        }
    }
}

impl<B: UsbBus> Drop for DeviceSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
