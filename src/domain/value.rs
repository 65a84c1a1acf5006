use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// 2captcha account API key.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    /// Query parameter name used by 2captcha (`key`).
    pub const FIELD: &'static str = "key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of a solving task returned by `in.php`.
///
/// Invariant: non-empty after trimming.
pub struct TaskId(String);

impl TaskId {
    /// Query parameter name used by `res.php` (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`TaskId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Solved CAPTCHA token, passed back to the protected site as-is.
///
/// The format depends on the variant (e.g. a `g-recaptcha-response` value).
pub struct Solution(String);

impl Solution {
    pub(crate) fn new(token: String) -> Self {
        Self(token)
    }

    /// Borrow the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the token.
    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Minimum reCAPTCHA v3 score a worker must reach (`min_score`).
///
/// 2captcha only accepts three thresholds.
pub enum MinScore {
    Low,
    Medium,
    High,
}

impl MinScore {
    /// Query parameter name used by 2captcha (`min_score`).
    pub const FIELD: &'static str = "min_score";

    /// Wire representation (`0.1`, `0.3`, `0.9`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "0.1",
            Self::Medium => "0.3",
            Self::High => "0.9",
        }
    }
}

impl FromStr for MinScore {
    type Err = ConfigError;

    /// Accepts `0.1`, `0.3`, `0.9` and the short forms `.1`, `.3`, `.9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0.1" | ".1" => Ok(Self::Low),
            "0.3" | ".3" => Ok(Self::Medium),
            "0.9" | ".9" => Ok(Self::High),
            _ => Err(ConfigError::InvalidScore {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Error code returned by 2captcha in the `request` field of a failed response.
///
/// This value is preserved as-is even when unknown to this crate.
pub struct ServiceCode(String);

impl ServiceCode {
    /// Construct a service code from its raw representation.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as provided by 2captcha.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(&self) -> Option<KnownServiceCode> {
        KnownServiceCode::from_code(&self.0)
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
/// Known 2captcha error codes supported by this crate.
///
/// Unknown codes are preserved as [`ServiceCode`] and return `None` from
/// [`KnownServiceCode::from_code`].
pub enum KnownServiceCode {
    NoSlotAvailable,
    CaptchaNotReady,
    WrongUserKey,
    KeyDoesNotExist,
    ZeroBalance,
    IpBanned,
    BadTokenOrPageUrl,
    GoogleKey,
    MaxUserTurn,
    CaptchaUnsolvable,
    WrongIdFormat,
    WrongCaptchaId,
    BadDuplicates,
    EmptyAction,
}

impl KnownServiceCode {
    /// Every known code, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::NoSlotAvailable,
        Self::CaptchaNotReady,
        Self::WrongUserKey,
        Self::KeyDoesNotExist,
        Self::ZeroBalance,
        Self::IpBanned,
        Self::BadTokenOrPageUrl,
        Self::GoogleKey,
        Self::MaxUserTurn,
        Self::CaptchaUnsolvable,
        Self::WrongIdFormat,
        Self::WrongCaptchaId,
        Self::BadDuplicates,
        Self::EmptyAction,
    ];

    /// Convert a raw 2captcha error string into a known variant.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code.trim() {
            "ERROR_NO_SLOT_AVAILABLE" => Self::NoSlotAvailable,
            // The service spells it without the T; both forms are seen in the wild.
            "CAPCHA_NOT_READY" | "CAPTCHA_NOT_READY" => Self::CaptchaNotReady,
            "ERROR_WRONG_USER_KEY" => Self::WrongUserKey,
            "ERROR_KEY_DOES_NOT_EXIST" => Self::KeyDoesNotExist,
            "ERROR_ZERO_BALANCE" => Self::ZeroBalance,
            "IP_BANNED" => Self::IpBanned,
            "ERROR_BAD_TOKEN_OR_PAGEURL" => Self::BadTokenOrPageUrl,
            "ERROR_GOOGLEKEY" => Self::GoogleKey,
            "MAX_USER_TURN" => Self::MaxUserTurn,
            "ERROR_CAPTCHA_UNSOLVABLE" => Self::CaptchaUnsolvable,
            "ERROR_WRONG_ID_FORMAT" => Self::WrongIdFormat,
            "ERROR_WRONG_CAPTCHA_ID" => Self::WrongCaptchaId,
            "ERROR_BAD_DUPLICATES" => Self::BadDuplicates,
            "ERROR_EMPTY_ACTION" => Self::EmptyAction,
            _ => return None,
        })
    }

    /// Canonical wire spelling of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSlotAvailable => "ERROR_NO_SLOT_AVAILABLE",
            Self::CaptchaNotReady => "CAPCHA_NOT_READY",
            Self::WrongUserKey => "ERROR_WRONG_USER_KEY",
            Self::KeyDoesNotExist => "ERROR_KEY_DOES_NOT_EXIST",
            Self::ZeroBalance => "ERROR_ZERO_BALANCE",
            Self::IpBanned => "IP_BANNED",
            Self::BadTokenOrPageUrl => "ERROR_BAD_TOKEN_OR_PAGEURL",
            Self::GoogleKey => "ERROR_GOOGLEKEY",
            Self::MaxUserTurn => "MAX_USER_TURN",
            Self::CaptchaUnsolvable => "ERROR_CAPTCHA_UNSOLVABLE",
            Self::WrongIdFormat => "ERROR_WRONG_ID_FORMAT",
            Self::WrongCaptchaId => "ERROR_WRONG_CAPTCHA_ID",
            Self::BadDuplicates => "ERROR_BAD_DUPLICATES",
            Self::EmptyAction => "ERROR_EMPTY_ACTION",
        }
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::NoSlotAvailable => "no free worker slot, task queue is full",
            Self::CaptchaNotReady => "captcha not solved yet",
            Self::WrongUserKey => "invalidly formatted api key",
            Self::KeyDoesNotExist => "api key does not exist",
            Self::ZeroBalance => "account balance is empty",
            Self::IpBanned => "ip address banned by the service",
            Self::BadTokenOrPageUrl => "invalid token or page url",
            Self::GoogleKey => "invalid site key",
            Self::MaxUserTurn => "too many requests, temporarily rate limited",
            Self::CaptchaUnsolvable => "captcha could not be solved",
            Self::WrongIdFormat => "invalidly formatted task id",
            Self::WrongCaptchaId => "task id does not exist",
            Self::BadDuplicates => "not enough matching answers",
            Self::EmptyAction => "action not found",
        }
    }
}
