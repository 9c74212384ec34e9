use crate::channel::ChannelSettings;
use crate::flags::{pack_flags, unpack_flags};
use crate::limits::MotorLimits;
use crate::settings::DeviceSettings;
use crate::wire::{WireChannelSettings, WireMotorLimits, WireSettings};
use enum_map::EnumMap;

/// Clock the firmware divides down to produce its baud rate.
const BAUD_CLOCK_HZ: u32 = 72_000_000;

/// The slowest baud rate whose register value fits in 16 bits.
pub const MIN_FIXED_BAUD_RATE_BPS: u32 = 1099;

/// Converts a baud rate in bits per second to the value of the device's baud
/// rate register. 0 stays 0, slower rates than [`MIN_FIXED_BAUD_RATE_BPS`] are
/// treated as that rate.
pub fn bps_to_baud_register(bps: u32) -> u16 {
    if bps == 0 {
        return 0;
    }
    let bps = bps.max(MIN_FIXED_BAUD_RATE_BPS);
    let register = (BAUD_CLOCK_HZ + bps / 2) / bps;
    u16::try_from(register).unwrap_or(u16::MAX)
}

pub fn baud_register_to_bps(register: u16) -> u32 {
    if register == 0 {
        return 0;
    }
    let register = u32::from(register);
    (BAUD_CLOCK_HZ + register / 2) / register
}

/// Converts settings into the image the firmware stores.
///
/// Values are copied as-is, nothing here checks ranges or threshold ordering.
pub fn encode(settings: &DeviceSettings) -> WireSettings {
    WireSettings {
        flags: pack_flags(settings.flags()),
        baud_register: bps_to_baud_register(settings.fixed_baud_rate_bps),
        speed_update_period: settings.speed_update_period,
        command_timeout: settings.command_timeout,
        serial_device_number: settings.serial_device_number,
        over_temp_complete_shutoff_threshold: settings.over_temp_complete_shutoff_threshold,
        over_temp_normal_operation_threshold: settings.over_temp_normal_operation_threshold,
        input_mode: settings.input_mode,
        pwm_period_factor: settings.pwm_period_factor,
        mixing_mode: settings.mixing_mode,
        min_pulse_period: settings.min_pulse_period,
        max_pulse_period: settings.max_pulse_period,
        rc_timeout: settings.rc_timeout,
        consec_good_pulses: settings.consec_good_pulses,
        vin_scale_calibration: settings.vin_scale_calibration,
        low_vin_shutoff_timeout: settings.low_vin_shutoff_timeout,
        low_vin_shutoff_mv: settings.low_vin_shutoff_mv,
        low_vin_startup_mv: settings.low_vin_startup_mv,
        high_vin_shutoff_mv: settings.high_vin_shutoff_mv,
        serial_mode: settings.serial_mode,
        channels: EnumMap::from_fn(|channel| WireChannelSettings::from(&settings.channels[channel])),
        limits: EnumMap::from_fn(|direction| WireMotorLimits::from(&settings.limits[direction])),
        current_limit: settings.current_limit,
        current_offset_calibration: settings.current_offset_calibration,
        current_scale_calibration: settings.current_scale_calibration,
    }
}

/// Builds settings from a firmware image. The product id isn't part of the
/// image, so the caller supplies it.
pub fn decode(product_id: u16, wire: &WireSettings) -> DeviceSettings {
    let mut settings = DeviceSettings {
        product_id,
        fixed_baud_rate_bps: baud_register_to_bps(wire.baud_register),
        speed_update_period: wire.speed_update_period,
        command_timeout: wire.command_timeout,
        serial_device_number: wire.serial_device_number,
        over_temp_complete_shutoff_threshold: wire.over_temp_complete_shutoff_threshold,
        over_temp_normal_operation_threshold: wire.over_temp_normal_operation_threshold,
        input_mode: wire.input_mode,
        pwm_period_factor: wire.pwm_period_factor,
        mixing_mode: wire.mixing_mode,
        min_pulse_period: wire.min_pulse_period,
        max_pulse_period: wire.max_pulse_period,
        rc_timeout: wire.rc_timeout,
        consec_good_pulses: wire.consec_good_pulses,
        vin_scale_calibration: wire.vin_scale_calibration,
        low_vin_shutoff_timeout: wire.low_vin_shutoff_timeout,
        low_vin_shutoff_mv: wire.low_vin_shutoff_mv,
        low_vin_startup_mv: wire.low_vin_startup_mv,
        high_vin_shutoff_mv: wire.high_vin_shutoff_mv,
        serial_mode: wire.serial_mode,
        channels: EnumMap::from_fn(|channel| ChannelSettings::from(&wire.channels[channel])),
        limits: EnumMap::from_fn(|direction| MotorLimits::from(&wire.limits[direction])),
        current_limit: wire.current_limit,
        current_offset_calibration: wire.current_offset_calibration,
        current_scale_calibration: wire.current_scale_calibration,
        ..DeviceSettings::new(product_id)
    };
    settings.set_flags(unpack_flags(wire.flags));
    settings
}

impl From<&ChannelSettings> for WireChannelSettings {
    fn from(channel: &ChannelSettings) -> Self {
        Self {
            invert: channel.invert,
            scaling_degree: channel.scaling_degree,
            alternate_use: channel.alternate_use,
            pin_mode: channel.pin_mode,
            error_min: channel.error_min,
            error_max: channel.error_max,
            input_min: channel.input_min,
            input_max: channel.input_max,
            input_neutral_min: channel.input_neutral_min,
            input_neutral_max: channel.input_neutral_max,
        }
    }
}

impl From<&WireChannelSettings> for ChannelSettings {
    fn from(wire: &WireChannelSettings) -> Self {
        Self {
            alternate_use: wire.alternate_use,
            invert: wire.invert,
            scaling_degree: wire.scaling_degree,
            pin_mode: wire.pin_mode,
            error_min: wire.error_min,
            error_max: wire.error_max,
            input_min: wire.input_min,
            input_max: wire.input_max,
            input_neutral_min: wire.input_neutral_min,
            input_neutral_max: wire.input_neutral_max,
        }
    }
}

impl From<&MotorLimits> for WireMotorLimits {
    fn from(limits: &MotorLimits) -> Self {
        Self {
            max_speed: limits.max_speed,
            max_acceleration: limits.max_acceleration,
            max_deceleration: limits.max_deceleration,
            brake_duration: limits.brake_duration,
            starting_speed: limits.starting_speed,
        }
    }
}

impl From<&WireMotorLimits> for MotorLimits {
    fn from(wire: &WireMotorLimits) -> Self {
        Self {
            max_speed: wire.max_speed,
            max_acceleration: wire.max_acceleration,
            max_deceleration: wire.max_deceleration,
            brake_duration: wire.brake_duration,
            starting_speed: wire.starting_speed,
        }
    }
}
