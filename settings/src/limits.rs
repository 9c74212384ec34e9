use serde::{Deserialize, Serialize};

/// Highest speed, acceleration or deceleration the firmware understands.
pub const MAX_SPEED: u16 = 3200;

/// Hard motor limits for one direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MotorLimits {
    pub max_speed: u16,

    /// How much the speed magnitude may grow per speed update period. 0 means no limit.
    pub max_acceleration: u16,

    /// How much the speed magnitude may shrink per speed update period. 0 means no limit.
    pub max_deceleration: u16,

    /// Milliseconds spent braking at speed zero before the direction may change.
    pub brake_duration: u16,

    /// Minimum non-zero speed. 0 means no effect.
    pub starting_speed: u16,
}

impl Default for MotorLimits {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            max_acceleration: 0,
            max_deceleration: 0,
            brake_duration: 0,
            starting_speed: 0,
        }
    }
}
