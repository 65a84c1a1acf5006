use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::validation::ConfigError;
use crate::domain::value::MinScore;

pub const PARAM_SITE_KEY: &str = "site-key";
pub const PARAM_SITE_URL: &str = "site-url";
pub const PARAM_ACTION: &str = "action";
pub const PARAM_MIN_SCORE: &str = "min-score";
pub const PARAM_KEY: &str = "key";
pub const PARAM_SURL: &str = "surl";

pub const SETTING_POLL_INTERVAL: &str = "poll-interval";
pub const SETTING_MAX_ATTEMPTS: &str = "max-attempts";
pub const SETTING_DEADLINE: &str = "deadline";

/// Requests a single phase may issue before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// CAPTCHA variants the solver knows how to submit.
pub enum CaptchaKind {
    RecaptchaV2,
    RecaptchaV3,
    FunCaptcha,
}

impl CaptchaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecaptchaV2 => "recaptcha-v2",
            Self::RecaptchaV3 => "recaptcha-v3",
            Self::FunCaptcha => "funcaptcha",
        }
    }

    /// Variant parameters that must be supplied to [`CaptchaTask::from_params`].
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            Self::RecaptchaV2 => &[PARAM_SITE_KEY, PARAM_SITE_URL],
            Self::RecaptchaV3 => &[PARAM_SITE_KEY, PARAM_SITE_URL, PARAM_ACTION, PARAM_MIN_SCORE],
            Self::FunCaptcha => &[PARAM_KEY, PARAM_SURL, PARAM_SITE_URL],
        }
    }
}

impl fmt::Display for CaptchaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptchaKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "recaptcha-v2" | "recaptchaV2" => Ok(Self::RecaptchaV2),
            "recaptcha-v3" | "recaptchaV3" => Ok(Self::RecaptchaV3),
            "funcaptcha" => Ok(Self::FunCaptcha),
            _ => Err(ConfigError::InvalidVariant {
                input: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A validated task description for one CAPTCHA variant.
pub enum CaptchaTask {
    RecaptchaV2(RecaptchaV2),
    RecaptchaV3(RecaptchaV3),
    FunCaptcha(FunCaptcha),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecaptchaV2 {
    site_key: String,
    page_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecaptchaV3 {
    site_key: String,
    page_url: String,
    action: String,
    min_score: MinScore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunCaptcha {
    public_key: String,
    surl: String,
    page_url: String,
}

impl CaptchaTask {
    pub fn recaptcha_v2(
        site_key: impl Into<String>,
        page_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let kind = CaptchaKind::RecaptchaV2;
        Ok(Self::RecaptchaV2(RecaptchaV2 {
            site_key: non_blank(kind, PARAM_SITE_KEY, site_key.into())?,
            page_url: non_blank(kind, PARAM_SITE_URL, page_url.into())?,
        }))
    }

    pub fn recaptcha_v3(
        site_key: impl Into<String>,
        page_url: impl Into<String>,
        action: impl Into<String>,
        min_score: MinScore,
    ) -> Result<Self, ConfigError> {
        let kind = CaptchaKind::RecaptchaV3;
        Ok(Self::RecaptchaV3(RecaptchaV3 {
            site_key: non_blank(kind, PARAM_SITE_KEY, site_key.into())?,
            page_url: non_blank(kind, PARAM_SITE_URL, page_url.into())?,
            action: non_blank(kind, PARAM_ACTION, action.into())?,
            min_score,
        }))
    }

    pub fn fun_captcha(
        public_key: impl Into<String>,
        surl: impl Into<String>,
        page_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let kind = CaptchaKind::FunCaptcha;
        Ok(Self::FunCaptcha(FunCaptcha {
            public_key: non_blank(kind, PARAM_KEY, public_key.into())?,
            surl: non_blank(kind, PARAM_SURL, surl.into())?,
            page_url: non_blank(kind, PARAM_SITE_URL, page_url.into())?,
        }))
    }

    /// Build a task from string-keyed variant parameters.
    ///
    /// Every key in [`CaptchaKind::required_params`] is checked before the
    /// recaptcha-v3 score is validated, so a missing key always wins over a
    /// bad score. Blank values count as missing.
    pub fn from_params(
        kind: CaptchaKind,
        params: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        for &param in kind.required_params() {
            lookup(kind, params, param)?;
        }

        match kind {
            CaptchaKind::RecaptchaV2 => Self::recaptcha_v2(
                lookup(kind, params, PARAM_SITE_KEY)?,
                lookup(kind, params, PARAM_SITE_URL)?,
            ),
            CaptchaKind::RecaptchaV3 => {
                let min_score = lookup(kind, params, PARAM_MIN_SCORE)?.parse::<MinScore>()?;
                Self::recaptcha_v3(
                    lookup(kind, params, PARAM_SITE_KEY)?,
                    lookup(kind, params, PARAM_SITE_URL)?,
                    lookup(kind, params, PARAM_ACTION)?,
                    min_score,
                )
            }
            CaptchaKind::FunCaptcha => Self::fun_captcha(
                lookup(kind, params, PARAM_KEY)?,
                lookup(kind, params, PARAM_SURL)?,
                lookup(kind, params, PARAM_SITE_URL)?,
            ),
        }
    }

    pub fn kind(&self) -> CaptchaKind {
        match self {
            Self::RecaptchaV2(_) => CaptchaKind::RecaptchaV2,
            Self::RecaptchaV3(_) => CaptchaKind::RecaptchaV3,
            Self::FunCaptcha(_) => CaptchaKind::FunCaptcha,
        }
    }
}

impl RecaptchaV2 {
    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }
}

impl RecaptchaV3 {
    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn min_score(&self) -> MinScore {
        self.min_score
    }
}

impl FunCaptcha {
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn surl(&self) -> &str {
        &self.surl
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }
}

fn lookup<'a>(
    kind: CaptchaKind,
    params: &'a HashMap<String, String>,
    param: &'static str,
) -> Result<&'a str, ConfigError> {
    match params.get(param) {
        Some(value) if !value.trim().is_empty() => Ok(value.as_str()),
        _ => Err(ConfigError::MissingVariantParam { kind, param }),
    }
}

fn non_blank(
    kind: CaptchaKind,
    param: &'static str,
    value: String,
) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingVariantParam { kind, param });
    }
    Ok(trimmed.to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Timing knobs shared by every phase of a solve.
pub struct SolverSettings {
    /// Delay between a retryable response and the next request.
    pub poll_interval: Duration,
    /// Requests a single phase may issue before giving up.
    pub max_attempts: u32,
    /// Upper bound for a whole `solve` call, if any.
    pub deadline: Option<Duration>,
}

impl SolverSettings {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            deadline: None,
        }
    }

    /// Parse settings from string values.
    ///
    /// Recognised keys: `poll-interval` (seconds, required), `max-attempts`
    /// and `deadline` (seconds). Unknown keys are ignored.
    pub fn from_map(settings: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let poll_interval = settings
            .get(SETTING_POLL_INTERVAL)
            .ok_or(ConfigError::MissingSetting {
                setting: SETTING_POLL_INTERVAL,
            })?;
        let mut parsed = Self::new(parse_seconds(SETTING_POLL_INTERVAL, poll_interval)?);

        if let Some(raw) = settings.get(SETTING_MAX_ATTEMPTS) {
            parsed.max_attempts = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|attempts| *attempts > 0)
                .ok_or_else(|| ConfigError::InvalidSetting {
                    setting: SETTING_MAX_ATTEMPTS,
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = settings.get(SETTING_DEADLINE) {
            parsed.deadline = Some(parse_seconds(SETTING_DEADLINE, raw)?);
        }

        Ok(parsed)
    }
}

fn parse_seconds(setting: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| ConfigError::InvalidSetting {
            setting,
            value: raw.to_owned(),
        })
}
