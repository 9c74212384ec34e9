use crate::device::libusb::device::LibUsbBus;
use crate::error::{TransportError, UsbError};
use lazy_static::lazy_static;
use log::debug;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod base;

// Only libusb is supported as a backend, on every platform.
pub mod libusb {
    pub mod device;
}

#[cfg(test)]
pub(crate) mod mock;

/// Holds a bus backend that is created on first use and reused until invalidated.
pub struct TransportContext<B> {
    bus: Option<B>,
    init: fn() -> Result<B, TransportError>,
}

impl<B: Clone> TransportContext<B> {
    pub const fn new(init: fn() -> Result<B, TransportError>) -> Self {
        Self { bus: None, init }
    }

    pub fn get(&mut self) -> Result<B, UsbError> {
        if let Some(bus) = &self.bus {
            return Ok(bus.clone());
        }

        debug!("Initialising USB transport context");
        let bus = (self.init)().map_err(|source| UsbError::Transport {
            message: String::from("Unable to initialise libusb."),
            source,
        })?;
        self.bus = Some(bus.clone());
        Ok(bus)
    }

    /// Drops the held backend, the next [`TransportContext::get`] creates a fresh one.
    pub fn invalidate(&mut self) {
        if self.bus.take().is_some() {
            debug!("USB transport context invalidated");
        }
    }

    pub fn is_initialised(&self) -> bool {
        self.bus.is_some()
    }
}

lazy_static! {
    static ref TRANSPORT: Mutex<TransportContext<LibUsbBus>> =
        Mutex::new(TransportContext::new(LibUsbBus::new));
}

fn lock_transport() -> MutexGuard<'static, TransportContext<LibUsbBus>> {
    // The slot is left consistent even if a holder panicked.
    TRANSPORT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The process-wide libusb context.
pub fn transport() -> Result<LibUsbBus, UsbError> {
    lock_transport().get()
}

pub fn invalidate_transport() {
    lock_transport().invalidate()
}
