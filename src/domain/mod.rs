//! Domain layer: strong types with validation and invariants (no I/O).

mod catalog;
mod request;
mod response;
mod validation;
mod value;

pub use catalog::{ErrorCatalog, ErrorClass};
pub use request::{
    CaptchaKind, CaptchaTask, DEFAULT_MAX_ATTEMPTS, FunCaptcha, PARAM_ACTION, PARAM_KEY,
    PARAM_MIN_SCORE, PARAM_SITE_KEY, PARAM_SITE_URL, PARAM_SURL, RecaptchaV2, RecaptchaV3,
    SETTING_DEADLINE, SETTING_MAX_ATTEMPTS, SETTING_POLL_INTERVAL, SolverSettings,
};
pub use response::{ResponseStatus, ServiceResponse};
pub use validation::ConfigError;
pub use value::{ApiKey, KnownServiceCode, MinScore, ServiceCode, Solution, TaskId};
