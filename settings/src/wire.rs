// The settings image exchanged with the firmware. Everything is packed with no
// padding, multi-byte values are little endian. Field order is fixed by the
// firmware, don't reorder anything in here.
use crate::error::WireError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use enum_map::EnumMap;
use smc_types::{
    Channel, ChannelAlternateUse, InputMode, MixingMode, MotorDirection, PinMode, SerialMode,
};
use std::io::{Cursor, Read, Write};
use strum::IntoEnumIterator;

pub const WIRE_CHANNEL_SIZE: usize = 16;
pub const WIRE_LIMITS_SIZE: usize = 10;
pub const WIRE_SETTINGS_SIZE: usize = 34 + 4 * WIRE_CHANNEL_SIZE + 2 * WIRE_LIMITS_SIZE + 6;

/// One 16 byte channel block. The firmware's leading flags byte is taken to hold
/// only the invert bit, with alternate use and pin mode in bytes of their own.
/// That split is a chosen layout, not one confirmed against firmware offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WireChannelSettings {
    pub invert: bool,
    pub scaling_degree: u8,
    pub alternate_use: ChannelAlternateUse,
    pub pin_mode: PinMode,
    pub error_min: u16,
    pub error_max: u16,
    pub input_min: u16,
    pub input_max: u16,
    pub input_neutral_min: u16,
    pub input_neutral_max: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WireMotorLimits {
    pub max_speed: u16,
    pub max_acceleration: u16,
    pub max_deceleration: u16,
    pub brake_duration: u16,
    pub starting_speed: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WireSettings {
    /// Bitmask register, see [`crate::flags::BoolSetting`].
    pub flags: u16,

    /// Device baud register value, not bits per second.
    pub baud_register: u16,
    pub speed_update_period: u16,
    pub command_timeout: u16,
    pub serial_device_number: u8,
    pub over_temp_complete_shutoff_threshold: u16,
    pub over_temp_normal_operation_threshold: u16,
    pub input_mode: InputMode,
    pub pwm_period_factor: u8,
    pub mixing_mode: MixingMode,
    pub min_pulse_period: u16,
    pub max_pulse_period: u16,
    pub rc_timeout: u16,
    pub consec_good_pulses: u8,
    pub vin_scale_calibration: u16,
    pub low_vin_shutoff_timeout: u16,
    pub low_vin_shutoff_mv: u16,
    pub low_vin_startup_mv: u16,
    pub high_vin_shutoff_mv: u16,
    pub serial_mode: SerialMode,
    pub channels: EnumMap<Channel, WireChannelSettings>,
    pub limits: EnumMap<MotorDirection, WireMotorLimits>,
    pub current_limit: u16,
    pub current_offset_calibration: u16,
    pub current_scale_calibration: u16,
}

impl WireChannelSettings {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), WireError> {
        writer.write_u8(u8::from(self.invert))?;
        writer.write_u8(self.scaling_degree)?;
        writer.write_u8(self.alternate_use.id())?;
        writer.write_u8(self.pin_mode.id())?;
        writer.write_u16::<LittleEndian>(self.error_min)?;
        writer.write_u16::<LittleEndian>(self.error_max)?;
        writer.write_u16::<LittleEndian>(self.input_min)?;
        writer.write_u16::<LittleEndian>(self.input_max)?;
        writer.write_u16::<LittleEndian>(self.input_neutral_min)?;
        writer.write_u16::<LittleEndian>(self.input_neutral_max)?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self, WireError> {
        let invert = reader.read_u8()? != 0;
        let scaling_degree = reader.read_u8()?;

        let alternate_use = ChannelAlternateUse::from_id(reader.read_u8()?);
        let pin_mode = PinMode::from_id(reader.read_u8()?);

        Ok(Self {
            invert,
            scaling_degree,
            alternate_use,
            pin_mode,
            error_min: reader.read_u16::<LittleEndian>()?,
            error_max: reader.read_u16::<LittleEndian>()?,
            input_min: reader.read_u16::<LittleEndian>()?,
            input_max: reader.read_u16::<LittleEndian>()?,
            input_neutral_min: reader.read_u16::<LittleEndian>()?,
            input_neutral_max: reader.read_u16::<LittleEndian>()?,
        })
    }
}

impl WireMotorLimits {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), WireError> {
        writer.write_u16::<LittleEndian>(self.max_speed)?;
        writer.write_u16::<LittleEndian>(self.max_acceleration)?;
        writer.write_u16::<LittleEndian>(self.max_deceleration)?;
        writer.write_u16::<LittleEndian>(self.brake_duration)?;
        writer.write_u16::<LittleEndian>(self.starting_speed)?;
        Ok(())
    }

    fn read_from<R: Read>(reader: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            max_speed: reader.read_u16::<LittleEndian>()?,
            max_acceleration: reader.read_u16::<LittleEndian>()?,
            max_deceleration: reader.read_u16::<LittleEndian>()?,
            brake_duration: reader.read_u16::<LittleEndian>()?,
            starting_speed: reader.read_u16::<LittleEndian>()?,
        })
    }
}

impl WireSettings {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), WireError> {
        writer.write_u16::<LittleEndian>(self.flags)?;
        writer.write_u16::<LittleEndian>(self.baud_register)?;
        writer.write_u16::<LittleEndian>(self.speed_update_period)?;
        writer.write_u16::<LittleEndian>(self.command_timeout)?;
        writer.write_u8(self.serial_device_number)?;
        writer.write_u16::<LittleEndian>(self.over_temp_complete_shutoff_threshold)?;
        writer.write_u16::<LittleEndian>(self.over_temp_normal_operation_threshold)?;
        writer.write_u8(self.input_mode.id())?;
        writer.write_u8(self.pwm_period_factor)?;
        writer.write_u8(self.mixing_mode.id())?;
        writer.write_u16::<LittleEndian>(self.min_pulse_period)?;
        writer.write_u16::<LittleEndian>(self.max_pulse_period)?;
        writer.write_u16::<LittleEndian>(self.rc_timeout)?;
        writer.write_u8(self.consec_good_pulses)?;
        writer.write_u16::<LittleEndian>(self.vin_scale_calibration)?;
        writer.write_u16::<LittleEndian>(self.low_vin_shutoff_timeout)?;
        writer.write_u16::<LittleEndian>(self.low_vin_shutoff_mv)?;
        writer.write_u16::<LittleEndian>(self.low_vin_startup_mv)?;
        writer.write_u16::<LittleEndian>(self.high_vin_shutoff_mv)?;
        writer.write_u8(self.serial_mode.id())?;

        for channel in self.channels.values() {
            channel.write_to(writer)?;
        }
        for limits in self.limits.values() {
            limits.write_to(writer)?;
        }

        writer.write_u16::<LittleEndian>(self.current_limit)?;
        writer.write_u16::<LittleEndian>(self.current_offset_calibration)?;
        writer.write_u16::<LittleEndian>(self.current_scale_calibration)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        let mut bytes = Vec::with_capacity(WIRE_SETTINGS_SIZE);
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Parses an image read back from the firmware. Trailing bytes are ignored, and
    /// mode bytes this crate doesn't recognise are kept as they are.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < WIRE_SETTINGS_SIZE {
            return Err(WireError::Truncated {
                expected: WIRE_SETTINGS_SIZE,
                actual: bytes.len(),
            });
        }

        let mut cursor = Cursor::new(bytes);
        let mut wire = WireSettings {
            flags: cursor.read_u16::<LittleEndian>()?,
            baud_register: cursor.read_u16::<LittleEndian>()?,
            speed_update_period: cursor.read_u16::<LittleEndian>()?,
            command_timeout: cursor.read_u16::<LittleEndian>()?,
            serial_device_number: cursor.read_u8()?,
            over_temp_complete_shutoff_threshold: cursor.read_u16::<LittleEndian>()?,
            over_temp_normal_operation_threshold: cursor.read_u16::<LittleEndian>()?,
            ..Default::default()
        };

        wire.input_mode = InputMode::from_id(cursor.read_u8()?);
        wire.pwm_period_factor = cursor.read_u8()?;
        wire.mixing_mode = MixingMode::from_id(cursor.read_u8()?);

        wire.min_pulse_period = cursor.read_u16::<LittleEndian>()?;
        wire.max_pulse_period = cursor.read_u16::<LittleEndian>()?;
        wire.rc_timeout = cursor.read_u16::<LittleEndian>()?;
        wire.consec_good_pulses = cursor.read_u8()?;
        wire.vin_scale_calibration = cursor.read_u16::<LittleEndian>()?;
        wire.low_vin_shutoff_timeout = cursor.read_u16::<LittleEndian>()?;
        wire.low_vin_shutoff_mv = cursor.read_u16::<LittleEndian>()?;
        wire.low_vin_startup_mv = cursor.read_u16::<LittleEndian>()?;
        wire.high_vin_shutoff_mv = cursor.read_u16::<LittleEndian>()?;

        wire.serial_mode = SerialMode::from_id(cursor.read_u8()?);

        for channel in Channel::iter() {
            wire.channels[channel] = WireChannelSettings::read_from(&mut cursor)?;
        }
        for direction in MotorDirection::iter() {
            wire.limits[direction] = WireMotorLimits::read_from(&mut cursor)?;
        }

        wire.current_limit = cursor.read_u16::<LittleEndian>()?;
        wire.current_offset_calibration = cursor.read_u16::<LittleEndian>()?;
        wire.current_scale_calibration = cursor.read_u16::<LittleEndian>()?;
        Ok(wire)
    }
}
