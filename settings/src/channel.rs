use serde::{Deserialize, Serialize};
use smc_types::{Channel, ChannelAlternateUse, ChannelType, PinMode};

/// Settings for a single input channel.
///
/// Raw values are in the channel's native units: quarter microseconds for RC
/// channels, 12-bit ADC counts for analog channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelSettings {
    /// Turns the channel into a limit or kill switch when it isn't driving the motor.
    pub alternate_use: ChannelAlternateUse,

    /// If true, a higher raw value maps to a lower scaled value.
    pub invert: bool,

    /// 0 = linear, 1 = quadratic, 2 = cubic, etc.
    pub scaling_degree: u8,

    /// Ignored by RC channels.
    pub pin_mode: PinMode,

    pub error_min: u16,
    pub error_max: u16,

    pub input_min: u16,
    pub input_max: u16,

    /// Raw values between the neutral bounds map to a speed of zero.
    pub input_neutral_min: u16,
    pub input_neutral_max: u16,
}

impl ChannelSettings {
    pub fn default_rc() -> Self {
        Self {
            error_min: 500 * 4,
            error_max: 2500 * 4,
            input_min: 1000 * 4,
            input_max: 2000 * 4,
            input_neutral_min: 1475 * 4,
            input_neutral_max: 1525 * 4,
            ..Self::blank()
        }
    }

    pub fn default_analog() -> Self {
        Self {
            error_min: 0,
            error_max: 4095,
            input_min: 40,
            input_max: 4055,
            input_neutral_min: 2015,
            input_neutral_max: 2080,
            ..Self::blank()
        }
    }

    pub fn defaults(channel: Channel) -> Self {
        match channel.channel_type() {
            ChannelType::Rc => Self::default_rc(),
            ChannelType::Analog => Self::default_analog(),
        }
    }

    fn blank() -> Self {
        Self {
            alternate_use: ChannelAlternateUse::None,
            invert: false,
            scaling_degree: 0,
            pin_mode: PinMode::Floating,
            error_min: 0,
            error_max: 0,
            input_min: 0,
            input_max: 0,
            input_neutral_min: 0,
            input_neutral_max: 0,
        }
    }
}
