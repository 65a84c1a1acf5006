use std::fmt;

use crate::domain::request::CaptchaKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Empty { field: &'static str },
    MissingSetting { setting: &'static str },
    InvalidSetting { setting: &'static str, value: String },
    InvalidVariant { input: String },
    MissingVariantParam { kind: CaptchaKind, param: &'static str },
    InvalidScore { input: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::MissingSetting { setting } => write!(f, "missing setting: {setting}"),
            Self::InvalidSetting { setting, value } => {
                write!(f, "invalid value for setting {setting}: {value}")
            }
            Self::InvalidVariant { input } => write!(f, "unsupported captcha variant: {input}"),
            Self::MissingVariantParam { kind, param } => {
                write!(f, "missing parameter {param} for {kind}")
            }
            Self::InvalidScore { input } => {
                write!(f, "invalid recaptcha-v3 min score: {input} (expected 0.1, 0.3 or 0.9)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::ConfigError;
    use crate::domain::request::CaptchaKind;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ConfigError::Empty { field: "key" };
        assert_eq!(err.to_string(), "key must not be empty");

        let err = ConfigError::MissingSetting {
            setting: "poll-interval",
        };
        assert_eq!(err.to_string(), "missing setting: poll-interval");

        let err = ConfigError::InvalidSetting {
            setting: "poll-interval",
            value: "-1".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for setting poll-interval: -1"
        );

        let err = ConfigError::InvalidVariant {
            input: "hcaptcha".to_owned(),
        };
        assert_eq!(err.to_string(), "unsupported captcha variant: hcaptcha");

        let err = ConfigError::MissingVariantParam {
            kind: CaptchaKind::FunCaptcha,
            param: "surl",
        };
        assert_eq!(err.to_string(), "missing parameter surl for funcaptcha");

        let err = ConfigError::InvalidScore {
            input: "0.5".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid recaptcha-v3 min score: 0.5 (expected 0.1, 0.3 or 0.9)"
        );
    }
}
