// These traits describe the small slice of libusb this crate needs, so the device
// list and session logic can run against something other than real hardware.
use crate::error::TransportError;
use std::fmt::Debug;
use std::time::Duration;

/// The largest data stage a control transfer can carry, its length field is 16 bits.
pub const MAX_CONTROL_TRANSFER_LENGTH: usize = u16::MAX as usize;

pub fn check_transfer_length(length: usize) -> Result<(), TransportError> {
    if length > MAX_CONTROL_TRANSFER_LENGTH {
        return Err(TransportError::InvalidParam);
    }
    Ok(())
}

/// The parts of a USB device descriptor used for matching and serial lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UsbIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    /// 0 if the device has no serial number string.
    pub serial_number_index: u8,
}

pub trait UsbBus {
    type Device: BusDevice<Handle = Self::Handle>;
    type Handle: BusHandle;

    /// Snapshots the devices currently on the bus. Every entry holds one reference
    /// to its device, which is released when the entry is dropped.
    fn devices(&self) -> Result<Vec<Self::Device>, TransportError>;
}

/// An owned reference to a device on the bus. Dropping it releases the reference.
pub trait BusDevice: Debug + Sized {
    type Handle: BusHandle;

    fn identity(&self) -> Result<UsbIdentity, TransportError>;

    /// Takes an additional reference to the same device.
    fn retain(&self) -> Self;

    /// True if both references point at the same native device.
    fn is_same(&self, other: &Self) -> bool;

    fn open(&self) -> Result<Self::Handle, TransportError>;
}

/// An open device handle. Dropping it closes the handle.
pub trait BusHandle {
    fn identity(&self) -> Result<UsbIdentity, TransportError>;

    /// Reads an ASCII string descriptor into `buffer`, returning the length read.
    fn read_string_ascii(&self, index: u8, buffer: &mut [u8]) -> Result<usize, TransportError>;

    /// The direction comes from bit 7 of `request_type`. Returns the bytes transferred.
    fn control_transfer(
        &self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_length_fits_sixteen_bits() {
        assert_eq!(check_transfer_length(0), Ok(()));
        assert_eq!(check_transfer_length(u16::MAX as usize), Ok(()));
        assert_eq!(
            check_transfer_length(u16::MAX as usize + 1),
            Err(TransportError::InvalidParam)
        );
    }
}
