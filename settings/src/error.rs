#[derive(thiserror::Error, Debug)]
pub enum WireError {
    #[error("Settings image is truncated, expected {expected} bytes but got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

/// A setting that will be written as-is but is unlikely to do what was intended.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsIssue {
    #[error("{channel}: error_min ({min}) should be less than error_max ({max})")]
    ErrorRange { channel: String, min: u16, max: u16 },

    #[error("{channel}: input thresholds should satisfy min <= neutral min <= neutral max <= max")]
    InputOrder { channel: String },

    #[error("{direction} {field} is {value}, the maximum is 3200")]
    LimitTooHigh {
        direction: String,
        field: &'static str,
        value: u16,
    },

    #[error("Current limit is {0}, the maximum is 3200")]
    CurrentLimitTooHigh(u16),

    #[error("Speed update period must not be 0")]
    ZeroSpeedUpdatePeriod,
}
