use enum_map::Enum;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// USB vendor id shared by every supported controller.
pub const VID_POLOLU: u16 = 0x1ffb;

pub const PID_SMC_G2_18V15: u16 = 0x00a3;
pub const PID_SMC_G2_24V12: u16 = 0x00a5;
pub const PID_SMC_G2_18V25: u16 = 0x00a7;
pub const PID_SMC_G2_24V19: u16 = 0x00a9;

#[derive(Copy, Clone, Debug, Display, Enum, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Product {
    #[strum(to_string = "Simple Motor Controller G2 18v15")]
    Smc18v15,
    #[strum(to_string = "Simple Motor Controller G2 24v12")]
    Smc24v12,
    #[strum(to_string = "Simple Motor Controller G2 18v25")]
    Smc18v25,
    #[strum(to_string = "Simple Motor Controller G2 24v19")]
    Smc24v19,
}

impl Product {
    pub fn product_id(&self) -> u16 {
        match self {
            Product::Smc18v15 => PID_SMC_G2_18V15,
            Product::Smc24v12 => PID_SMC_G2_24V12,
            Product::Smc18v25 => PID_SMC_G2_18V25,
            Product::Smc24v19 => PID_SMC_G2_24V19,
        }
    }

    pub fn from_product_id(product_id: u16) -> Option<Self> {
        Product::iter().find(|product| product.product_id() == product_id)
    }

    /// Every product id the USB layer should accept while scanning the bus.
    pub fn all_product_ids() -> Vec<u16> {
        Product::iter().map(|product| product.product_id()).collect()
    }
}

/// Whether a channel measures pulse widths or an analog voltage.
#[derive(Copy, Clone, Debug, Display, EnumIter, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelType {
    Rc,
    Analog,
}

// Order matters, it's the order the channels are laid out on the wire.
#[derive(Copy, Clone, Debug, Display, Enum, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Channel {
    Rc1,
    Rc2,
    Analog1,
    Analog2,
}

impl Channel {
    pub fn channel_type(&self) -> ChannelType {
        match self {
            Channel::Rc1 | Channel::Rc2 => ChannelType::Rc,
            Channel::Analog1 | Channel::Analog2 => ChannelType::Analog,
        }
    }
}

#[derive(Copy, Clone, Debug, Display, Enum, EnumIter, EnumCount, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotorDirection {
    Forward,
    Reverse,
}

// The mode enums below keep any byte the firmware reports. Values this crate
// doesn't know about are carried as `Unknown` so they're written back unchanged.

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputMode {
    #[default]
    SerialUsb,
    Analog,
    Rc,
    Unknown(u8),
}

impl InputMode {
    pub fn id(&self) -> u8 {
        match self {
            InputMode::SerialUsb => 0,
            InputMode::Analog => 1,
            InputMode::Rc => 2,
            InputMode::Unknown(id) => *id,
        }
    }

    pub fn from_id(id: u8) -> Self {
        match id {
            0 => InputMode::SerialUsb,
            1 => InputMode::Analog,
            2 => InputMode::Rc,
            other => InputMode::Unknown(other),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MixingMode {
    #[default]
    None,
    Left,
    Right,
    Unknown(u8),
}

impl MixingMode {
    pub fn id(&self) -> u8 {
        match self {
            MixingMode::None => 0,
            MixingMode::Left => 1,
            MixingMode::Right => 2,
            MixingMode::Unknown(id) => *id,
        }
    }

    pub fn from_id(id: u8) -> Self {
        match id {
            0 => MixingMode::None,
            1 => MixingMode::Left,
            2 => MixingMode::Right,
            other => MixingMode::Unknown(other),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SerialMode {
    #[default]
    Binary,
    Ascii,
    Unknown(u8),
}

impl SerialMode {
    pub fn id(&self) -> u8 {
        match self {
            SerialMode::Binary => 0,
            SerialMode::Ascii => 1,
            SerialMode::Unknown(id) => *id,
        }
    }

    pub fn from_id(id: u8) -> Self {
        match id {
            0 => SerialMode::Binary,
            1 => SerialMode::Ascii,
            other => SerialMode::Unknown(other),
        }
    }
}

/// Lets a channel that isn't driving the motor act as a switch instead.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelAlternateUse {
    #[default]
    None,
    LimitForward,
    LimitReverse,
    KillSwitch,
    Unknown(u8),
}

impl ChannelAlternateUse {
    pub fn id(&self) -> u8 {
        match self {
            ChannelAlternateUse::None => 0,
            ChannelAlternateUse::LimitForward => 1,
            ChannelAlternateUse::LimitReverse => 2,
            ChannelAlternateUse::KillSwitch => 3,
            ChannelAlternateUse::Unknown(id) => *id,
        }
    }

    pub fn from_id(id: u8) -> Self {
        match id {
            0 => ChannelAlternateUse::None,
            1 => ChannelAlternateUse::LimitForward,
            2 => ChannelAlternateUse::LimitReverse,
            3 => ChannelAlternateUse::KillSwitch,
            other => ChannelAlternateUse::Unknown(other),
        }
    }
}

/// Analog pin bias. RC channels ignore this.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinMode {
    #[default]
    Floating,
    PullUp,
    PullDown,
    Unknown(u8),
}

impl PinMode {
    pub fn id(&self) -> u8 {
        match self {
            PinMode::Floating => 0,
            PinMode::PullUp => 1,
            PinMode::PullDown => 2,
            PinMode::Unknown(id) => *id,
        }
    }

    pub fn from_id(id: u8) -> Self {
        match id {
            0 => PinMode::Floating,
            1 => PinMode::PullUp,
            2 => PinMode::PullDown,
            other => PinMode::Unknown(other),
        }
    }
}
