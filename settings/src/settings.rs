use crate::channel::ChannelSettings;
use crate::codec::encode;
use crate::defaults::product_defaults;
use crate::flags::BoolSetting;
use crate::limits::MotorLimits;
use enum_map::EnumMap;
use enumset::EnumSet;
use serde::{Deserialize, Serialize};
use smc_types::{Channel, InputMode, MixingMode, MotorDirection, SerialMode};
use std::hash::{Hash, Hasher};

/// Every setting stored in a Simple Motor Controller's non-volatile memory.
///
/// Two settings are equal when they encode to the same firmware image. The product
/// id isn't compared, and baud rates are compared by their register value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// The product these settings are for, or 0 if not known.
    pub product_id: u16,

    /// Never enter USB suspend mode.
    pub never_sleep: bool,

    /// Insert a one-byte delay before sending serial responses.
    pub uart_response_delay: bool,

    /// Use `fixed_baud_rate_bps` instead of auto-detecting the baud rate.
    pub use_fixed_baud_rate: bool,

    pub disable_safe_start: bool,

    /// Use SDA/SCL for I2C instead of TX/RX for the UART.
    pub enable_i2c: bool,

    /// Don't stop the motor when the ERR line is driven high externally.
    pub ignore_err_line_high: bool,

    /// Limit speed gradually from the normal operation threshold rather than
    /// cutting it at the complete shutoff threshold.
    pub temp_limit_gradual: bool,

    /// Don't check for potentiometer disconnects by toggling the pot power pins.
    pub ignore_pot_disconnect: bool,

    pub motor_invert: bool,

    /// Coast instead of brake while the motor is at speed zero.
    pub coast_when_off: bool,

    pub crc_for_commands: bool,
    pub crc_for_responses: bool,

    pub fixed_baud_rate_bps: u32,

    /// Time between acceleration updates, in milliseconds. Should never be 0.
    pub speed_update_period: u16,

    /// In units of 10ms, 0 disables the command timeout.
    pub command_timeout: u16,

    pub serial_device_number: u8,

    /// Tenths of a degree Celsius.
    pub over_temp_complete_shutoff_threshold: u16,
    pub over_temp_normal_operation_threshold: u16,

    pub input_mode: InputMode,

    /// 0 to 19, 0 is the highest PWM frequency.
    pub pwm_period_factor: u8,

    pub mixing_mode: MixingMode,

    /// Allowed time between RC pulse rising edges, in milliseconds.
    pub min_pulse_period: u16,
    pub max_pulse_period: u16,

    /// How long without a good RC pulse before an error, in milliseconds.
    pub rc_timeout: u16,

    pub consec_good_pulses: u8,

    pub vin_scale_calibration: u16,
    pub low_vin_shutoff_timeout: u16,
    pub low_vin_shutoff_mv: u16,
    pub low_vin_startup_mv: u16,
    pub high_vin_shutoff_mv: u16,

    pub serial_mode: SerialMode,

    pub channels: EnumMap<Channel, ChannelSettings>,
    pub limits: EnumMap<MotorDirection, MotorLimits>,

    /// 0 to 3200.
    pub current_limit: u16,
    pub current_offset_calibration: u16,
    pub current_scale_calibration: u16,
}

impl DeviceSettings {
    /// Factory settings for the given product. Pass 0 if the product isn't known yet.
    pub fn new(product_id: u16) -> Self {
        let product = product_defaults(product_id);

        Self {
            product_id,
            never_sleep: false,
            uart_response_delay: false,
            use_fixed_baud_rate: false,
            disable_safe_start: false,
            enable_i2c: false,
            ignore_err_line_high: false,
            temp_limit_gradual: false,
            ignore_pot_disconnect: false,
            motor_invert: false,
            coast_when_off: false,
            crc_for_commands: false,
            crc_for_responses: false,
            fixed_baud_rate_bps: 9600,
            speed_update_period: 1,
            command_timeout: 0,
            serial_device_number: 13,
            over_temp_complete_shutoff_threshold: 80 * 10,
            over_temp_normal_operation_threshold: 70 * 10,
            input_mode: InputMode::SerialUsb,
            pwm_period_factor: 0,
            mixing_mode: MixingMode::None,
            min_pulse_period: 9,
            max_pulse_period: 100,
            rc_timeout: 500,
            consec_good_pulses: 2,
            vin_scale_calibration: 1148,
            low_vin_shutoff_timeout: 250,
            low_vin_shutoff_mv: 5500,
            low_vin_startup_mv: 6500,
            high_vin_shutoff_mv: product.high_vin_shutoff_mv,
            serial_mode: SerialMode::Binary,
            channels: EnumMap::from_fn(ChannelSettings::defaults),
            limits: EnumMap::from_fn(|_| MotorLimits::default()),
            current_limit: product.current_limit,
            current_offset_calibration: 993,
            current_scale_calibration: 8057,
        }
    }

    pub fn channel(&self, channel: Channel) -> &ChannelSettings {
        &self.channels[channel]
    }

    pub fn limits(&self, direction: MotorDirection) -> &MotorLimits {
        &self.limits[direction]
    }

    pub fn flag(&self, setting: BoolSetting) -> bool {
        match setting {
            BoolSetting::NeverSleep => self.never_sleep,
            BoolSetting::UartResponseDelay => self.uart_response_delay,
            BoolSetting::UseFixedBaudRate => self.use_fixed_baud_rate,
            BoolSetting::DisableSafeStart => self.disable_safe_start,
            BoolSetting::EnableI2c => self.enable_i2c,
            BoolSetting::IgnoreErrLineHigh => self.ignore_err_line_high,
            BoolSetting::TempLimitGradual => self.temp_limit_gradual,
            BoolSetting::IgnorePotDisconnect => self.ignore_pot_disconnect,
            BoolSetting::MotorInvert => self.motor_invert,
            BoolSetting::CoastWhenOff => self.coast_when_off,
            BoolSetting::CrcForCommands => self.crc_for_commands,
            BoolSetting::CrcForResponses => self.crc_for_responses,
        }
    }

    pub fn flag_mut(&mut self, setting: BoolSetting) -> &mut bool {
        match setting {
            BoolSetting::NeverSleep => &mut self.never_sleep,
            BoolSetting::UartResponseDelay => &mut self.uart_response_delay,
            BoolSetting::UseFixedBaudRate => &mut self.use_fixed_baud_rate,
            BoolSetting::DisableSafeStart => &mut self.disable_safe_start,
            BoolSetting::EnableI2c => &mut self.enable_i2c,
            BoolSetting::IgnoreErrLineHigh => &mut self.ignore_err_line_high,
            BoolSetting::TempLimitGradual => &mut self.temp_limit_gradual,
            BoolSetting::IgnorePotDisconnect => &mut self.ignore_pot_disconnect,
            BoolSetting::MotorInvert => &mut self.motor_invert,
            BoolSetting::CoastWhenOff => &mut self.coast_when_off,
            BoolSetting::CrcForCommands => &mut self.crc_for_commands,
            BoolSetting::CrcForResponses => &mut self.crc_for_responses,
        }
    }

    /// The boolean settings that are currently on.
    pub fn flags(&self) -> EnumSet<BoolSetting> {
        EnumSet::<BoolSetting>::all()
            .iter()
            .filter(|setting| self.flag(*setting))
            .collect()
    }

    /// Turns on exactly the settings in `flags`, and off every other one.
    pub fn set_flags(&mut self, flags: EnumSet<BoolSetting>) {
        for setting in EnumSet::<BoolSetting>::all() {
            *self.flag_mut(setting) = flags.contains(setting);
        }
    }
}

impl PartialEq for DeviceSettings {
    fn eq(&self, other: &Self) -> bool {
        encode(self) == encode(other)
    }
}

impl Eq for DeviceSettings {}

impl Hash for DeviceSettings {
    fn hash<H: Hasher>(&self, state: &mut H) {
        encode(self).hash(state);
    }
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings::new(0)
    }
}
