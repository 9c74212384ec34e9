/// The failure categories libusb reports as negative status codes.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TransportError {
    #[error("I/O error.")]
    Io,

    #[error("Invalid parameter.")]
    InvalidParam,

    #[error("Access denied.")]
    Access,

    #[error("Device does not exist.")]
    NoDevice,

    #[error("No such entity.")]
    NotFound,

    #[error("Busy.")]
    Busy,

    #[error("Timeout.")]
    Timeout,

    #[error("Overflow.")]
    Overflow,

    #[error("Pipe error.")]
    Pipe,

    #[error("System call was interrupted.")]
    Interrupted,

    #[error("Out of memory.")]
    NoMem,

    #[error("Unsupported/unimplemented operation.")]
    NotSupported,

    #[error("Other error.")]
    Other,

    #[error("Unknown error code {0}.")]
    Unknown(i32),
}

const NATIVE_CODES: [(i32, TransportError); 13] = [
    (-1, TransportError::Io),
    (-2, TransportError::InvalidParam),
    (-3, TransportError::Access),
    (-4, TransportError::NoDevice),
    (-5, TransportError::NotFound),
    (-6, TransportError::Busy),
    (-7, TransportError::Timeout),
    (-8, TransportError::Overflow),
    (-9, TransportError::Pipe),
    (-10, TransportError::Interrupted),
    (-11, TransportError::NoMem),
    (-12, TransportError::NotSupported),
    (-99, TransportError::Other),
];

impl TransportError {
    /// The libusb status code for this category.
    pub fn code(&self) -> i32 {
        match self {
            TransportError::Unknown(code) => *code,
            known => NATIVE_CODES
                .iter()
                .find(|(_, error)| error == known)
                .map(|(code, _)| *code)
                .unwrap_or(-99),
        }
    }
}

/// Maps a libusb status code to its category. Non-negative codes aren't errors.
pub fn translate(code: i32) -> Option<TransportError> {
    if code >= 0 {
        return None;
    }
    let error = NATIVE_CODES
        .iter()
        .find(|(native, _)| *native == code)
        .map(|(_, error)| *error)
        .unwrap_or(TransportError::Unknown(code));
    Some(error)
}

/// Passes byte counts and other non-negative results through, fails on anything negative.
pub fn guard(code: i32) -> Result<u32, TransportError> {
    match translate(code) {
        Some(error) => Err(error),
        None => Ok(code.unsigned_abs()),
    }
}

/// As [`guard`], but wraps a failure with a message while keeping its category.
pub fn guard_with(code: i32, message: impl Into<String>) -> Result<u32, UsbError> {
    guard(code).map_err(|source| UsbError::Transport {
        message: message.into(),
        source,
    })
}

impl From<rusb::Error> for TransportError {
    fn from(error: rusb::Error) -> Self {
        match error {
            rusb::Error::Io => TransportError::Io,
            rusb::Error::InvalidParam => TransportError::InvalidParam,
            rusb::Error::Access => TransportError::Access,
            rusb::Error::NoDevice => TransportError::NoDevice,
            rusb::Error::NotFound => TransportError::NotFound,
            rusb::Error::Busy => TransportError::Busy,
            rusb::Error::Timeout => TransportError::Timeout,
            rusb::Error::Overflow => TransportError::Overflow,
            rusb::Error::Pipe => TransportError::Pipe,
            rusb::Error::Interrupted => TransportError::Interrupted,
            rusb::Error::NoMem => TransportError::NoMem,
            rusb::Error::NotSupported => TransportError::NotSupported,
            _ => TransportError::Other,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UsbError {
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("{message}")]
    Enumerate {
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("{message}")]
    Session {
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("The device session has already been closed")]
    SessionClosed,

    #[error("USB hotplug notifications are not supported")]
    HotplugUnsupported,
}

impl UsbError {
    pub(crate) fn enumerate(message: impl Into<String>, source: TransportError) -> Self {
        UsbError::Enumerate {
            message: message.into(),
            source,
        }
    }

    pub(crate) fn session(message: impl Into<String>, source: TransportError) -> Self {
        UsbError::Session {
            message: message.into(),
            source,
        }
    }

    /// The transport failure underneath this error, if there was one.
    pub fn category(&self) -> Option<TransportError> {
        match self {
            UsbError::Transport { source, .. }
            | UsbError::Enumerate { source, .. }
            | UsbError::Session { source, .. } => Some(*source),
            UsbError::SessionClosed | UsbError::HotplugUnsupported => None,
        }
    }
}
