// A simulated bus for exercising enumeration and sessions without hardware. Device
// references and open handles are counted so tests can check nothing leaks or is
// released twice.
use crate::device::base::{BusDevice, BusHandle, UsbBus, UsbIdentity};
use crate::error::{guard, TransportError};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::time::Duration;

pub(crate) const SERIAL_INDEX: u8 = 3;

/// What a simulated device reports, and the status code each operation returns.
#[derive(Debug, Clone)]
pub(crate) struct MockDeviceConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial: String,
    pub serial_index: u8,
    pub descriptor_status: i32,
    pub open_status: i32,
    pub serial_status: i32,
    pub transfer_status: i32,
}

impl MockDeviceConfig {
    pub fn new(vendor_id: u16, product_id: u16, serial: &str) -> Self {
        Self {
            vendor_id,
            product_id,
            serial: serial.to_string(),
            serial_index: SERIAL_INDEX,
            descriptor_status: 0,
            open_status: 0,
            serial_status: 0,
            transfer_status: 0,
        }
    }

    pub fn descriptor_status(mut self, code: i32) -> Self {
        self.descriptor_status = code;
        self
    }

    pub fn open_status(mut self, code: i32) -> Self {
        self.open_status = code;
        self
    }

    /// Reports no serial number string, as if the descriptor's index were 0.
    pub fn without_serial(mut self) -> Self {
        self.serial_index = 0;
        self
    }

    pub fn serial_status(mut self, code: i32) -> Self {
        self.serial_status = code;
        self
    }
}

/// A control transfer as it reached the simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transfer {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: usize,
    pub timeout: Duration,
}

#[derive(Debug, Default)]
struct BusState {
    configs: Vec<MockDeviceConfig>,
    references: Vec<i32>,
    handles: Vec<i32>,
    over_released: bool,
    list_status: i32,
    transfers: Vec<Transfer>,
    string_reads: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct MockBus {
    state: Rc<RefCell<BusState>>,
}

impl MockBus {
    pub fn new(configs: Vec<MockDeviceConfig>) -> Self {
        let count = configs.len();
        Self {
            state: Rc::new(RefCell::new(BusState {
                configs,
                references: vec![0; count],
                handles: vec![0; count],
                ..Default::default()
            })),
        }
    }

    /// A bus whose device list can't be fetched.
    pub fn failing(code: i32) -> Self {
        let bus = Self::new(Vec::new());
        bus.state.borrow_mut().list_status = code;
        bus
    }

    pub fn shares_state_with(&self, other: &MockBus) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Outstanding references to the device at `index`.
    pub fn references(&self, index: usize) -> i32 {
        self.state.borrow().references[index]
    }

    pub fn total_references(&self) -> i32 {
        self.state.borrow().references.iter().sum()
    }

    pub fn open_handles(&self, index: usize) -> i32 {
        self.state.borrow().handles[index]
    }

    pub fn total_open_handles(&self) -> i32 {
        self.state.borrow().handles.iter().sum()
    }

    pub fn over_released(&self) -> bool {
        self.state.borrow().over_released
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.state.borrow().transfers.clone()
    }

    /// How many string descriptors have been read, from any device.
    pub fn string_reads(&self) -> usize {
        self.state.borrow().string_reads
    }

    pub fn set_serial(&self, index: usize, serial: &str) {
        self.state.borrow_mut().configs[index].serial = serial.to_string();
    }

    pub fn set_open_status(&self, index: usize, code: i32) {
        self.state.borrow_mut().configs[index].open_status = code;
    }

    pub fn set_transfer_status(&self, index: usize, code: i32) {
        self.state.borrow_mut().configs[index].transfer_status = code;
    }
}

impl UsbBus for MockBus {
    type Device = MockDevice;
    type Handle = MockHandle;

    fn devices(&self) -> Result<Vec<MockDevice>, TransportError> {
        let status = self.state.borrow().list_status;
        guard(status)?;

        let count = self.state.borrow().configs.len();
        Ok((0..count)
            .map(|index| MockDevice::acquire(&self.state, index))
            .collect())
    }
}

pub(crate) struct MockDevice {
    index: usize,
    state: Rc<RefCell<BusState>>,
}

impl MockDevice {
    fn acquire(state: &Rc<RefCell<BusState>>, index: usize) -> Self {
        state.borrow_mut().references[index] += 1;
        Self {
            index,
            state: state.clone(),
        }
    }
}

impl Debug for MockDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockDevice({})", self.index)
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.references[self.index] -= 1;
        if state.references[self.index] < 0 {
            state.over_released = true;
        }
    }
}

fn identity(state: &BusState, index: usize) -> Result<UsbIdentity, TransportError> {
    let config = &state.configs[index];
    guard(config.descriptor_status)?;
    Ok(UsbIdentity {
        vendor_id: config.vendor_id,
        product_id: config.product_id,
        serial_number_index: config.serial_index,
    })
}

impl BusDevice for MockDevice {
    type Handle = MockHandle;

    fn identity(&self) -> Result<UsbIdentity, TransportError> {
        identity(&self.state.borrow(), self.index)
    }

    fn retain(&self) -> Self {
        MockDevice::acquire(&self.state, self.index)
    }

    fn is_same(&self, other: &Self) -> bool {
        self.index == other.index && Rc::ptr_eq(&self.state, &other.state)
    }

    fn open(&self) -> Result<MockHandle, TransportError> {
        let mut state = self.state.borrow_mut();
        guard(state.configs[self.index].open_status)?;
        state.handles[self.index] += 1;
        Ok(MockHandle {
            index: self.index,
            state: self.state.clone(),
        })
    }
}

pub(crate) struct MockHandle {
    index: usize,
    state: Rc<RefCell<BusState>>,
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.handles[self.index] -= 1;
        if state.handles[self.index] < 0 {
            state.over_released = true;
        }
    }
}

impl BusHandle for MockHandle {
    fn identity(&self) -> Result<UsbIdentity, TransportError> {
        identity(&self.state.borrow(), self.index)
    }

    fn read_string_ascii(&self, index: u8, buffer: &mut [u8]) -> Result<usize, TransportError> {
        let mut state = self.state.borrow_mut();
        state.string_reads += 1;

        let config = &state.configs[self.index];
        guard(config.serial_status)?;

        // Descriptor 0 is the language id table, not a string.
        let bytes = match index {
            0 => &[0x09, 0x04][..],
            SERIAL_INDEX => config.serial.as_bytes(),
            _ => return Err(TransportError::InvalidParam),
        };
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
        let mut state = self.state.borrow_mut();
        guard(state.configs[self.index].transfer_status)?;

        // Reads come back filled with the request number.
        if request_type & 0x80 != 0 {
            data.fill(request);
        }
        state.transfers.push(Transfer {
            request_type,
            request,
            value,
            index,
            length: data.len(),
            timeout,
        });
        Ok(data.len())
    }
}
