use enumset::{EnumSet, EnumSetType};
use strum::Display;

/// The boolean settings the firmware keeps in a single bitmask register.
///
/// Each discriminant is the bit the setting owns in that register.
#[derive(Debug, Display, EnumSetType)]
pub enum BoolSetting {
    NeverSleep = 0,
    UartResponseDelay = 1,
    UseFixedBaudRate = 2,
    DisableSafeStart = 3,
    EnableI2c = 4,
    IgnoreErrLineHigh = 5,
    TempLimitGradual = 6,
    IgnorePotDisconnect = 7,
    MotorInvert = 8,
    CoastWhenOff = 9,
    CrcForCommands = 10,
    CrcForResponses = 11,
}

impl BoolSetting {
    /// The register mask for this setting alone.
    pub fn mask(self) -> u16 {
        1 << (self as u16)
    }
}

pub fn pack_flags(flags: EnumSet<BoolSetting>) -> u16 {
    flags.as_u16()
}

/// Bits that don't belong to any known setting are dropped.
pub fn unpack_flags(register: u16) -> EnumSet<BoolSetting> {
    EnumSet::from_u16_truncated(register)
}
