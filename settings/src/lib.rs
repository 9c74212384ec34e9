pub mod channel;
pub mod codec;
pub mod defaults;
pub mod error;
pub mod file;
pub mod flags;
pub mod limits;
pub mod settings;
pub mod validate;
pub mod wire;

pub use channel::ChannelSettings;
pub use codec::{decode, encode};
pub use error::{SettingsIssue, WireError};
pub use flags::BoolSetting;
pub use limits::MotorLimits;
pub use settings::DeviceSettings;
pub use wire::WireSettings;
