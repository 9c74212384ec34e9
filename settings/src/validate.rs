use crate::error::SettingsIssue;
use crate::limits::MAX_SPEED;
use crate::settings::DeviceSettings;

impl DeviceSettings {
    /// Lists settings that are likely mistakes. Nothing is changed, and the
    /// codec will happily encode settings that have issues.
    pub fn validate(&self) -> Vec<SettingsIssue> {
        let mut issues = Vec::new();

        if self.speed_update_period == 0 {
            issues.push(SettingsIssue::ZeroSpeedUpdatePeriod);
        }

        for (channel, settings) in &self.channels {
            if settings.error_min >= settings.error_max {
                issues.push(SettingsIssue::ErrorRange {
                    channel: channel.to_string(),
                    min: settings.error_min,
                    max: settings.error_max,
                });
            }

            let ordered = settings.input_min <= settings.input_neutral_min
                && settings.input_neutral_min <= settings.input_neutral_max
                && settings.input_neutral_max <= settings.input_max;
            if !ordered {
                issues.push(SettingsIssue::InputOrder {
                    channel: channel.to_string(),
                });
            }
        }

        for (direction, limits) in &self.limits {
            let fields = [
                ("max_speed", limits.max_speed),
                ("max_acceleration", limits.max_acceleration),
                ("max_deceleration", limits.max_deceleration),
                ("starting_speed", limits.starting_speed),
            ];
            for (field, value) in fields {
                if value > MAX_SPEED {
                    issues.push(SettingsIssue::LimitTooHigh {
                        direction: direction.to_string(),
                        field,
                        value,
                    });
                }
            }
        }

        if self.current_limit > MAX_SPEED {
            issues.push(SettingsIssue::CurrentLimitTooHigh(self.current_limit));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};
    use smc_types::{Channel, MotorDirection};

    #[test]
    fn factory_settings_have_no_issues() {
        for product_id in [0, 0xa3, 0xa5, 0xa7, 0xa9] {
            assert!(DeviceSettings::new(product_id).validate().is_empty());
        }
    }

    #[test]
    fn reports_threshold_problems() {
        let mut settings = DeviceSettings::default();
        settings.channels[Channel::Rc2].error_min = 10000;
        settings.channels[Channel::Analog1].input_neutral_min = 4080;

        let issues = settings.validate();
        assert_eq!(
            issues,
            vec![
                SettingsIssue::ErrorRange {
                    channel: "Rc2".to_string(),
                    min: 10000,
                    max: 10000,
                },
                SettingsIssue::InputOrder {
                    channel: "Analog1".to_string(),
                },
            ]
        );
    }

    #[test]
    fn reports_limit_problems() {
        let mut settings = DeviceSettings::default();
        settings.speed_update_period = 0;
        settings.limits[MotorDirection::Reverse].max_deceleration = 3201;
        settings.current_limit = 4000;

        let issues = settings.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&SettingsIssue::ZeroSpeedUpdatePeriod));
        assert!(issues.contains(&SettingsIssue::LimitTooHigh {
            direction: "Reverse".to_string(),
            field: "max_deceleration",
            value: 3201,
        }));
        assert!(issues.contains(&SettingsIssue::CurrentLimitTooHigh(4000)));
    }

    #[test]
    fn issues_do_not_stop_encoding() {
        let mut settings = DeviceSettings::default();
        settings.channels[Channel::Rc1].input_min = 9000;
        assert!(!settings.validate().is_empty());
        assert_eq!(decode(0, &encode(&settings)), settings);
    }
}
