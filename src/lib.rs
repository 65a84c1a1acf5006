//! Typed Rust client for the 2captcha solving service.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for wire-format quirks, and a small client layer running the two-phase
//! create-then-poll protocol.
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use twocaptcha::{ApiKey, CaptchaSolver, CaptchaTask};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), twocaptcha::TwoCaptchaError> {
//!     let task = CaptchaTask::recaptcha_v2("6Le-wvkSAAAAAPBMRTvw0Q4Muexq9bi0DJwx_mJ-", "https://example.com")?;
//!     let solver = CaptchaSolver::builder(ApiKey::new("...")?, task)
//!         .poll_interval(Duration::from_secs(5))
//!         .build()
//!         .await?;
//!     let solution = solver.solve().await?;
//!     println!("{}", solution.as_str());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxFuture, CaptchaSolver, CaptchaSolverBuilder, HttpResponse, HttpTransport, Phase,
    TwoCaptchaError,
};
pub use domain::{
    ApiKey, CaptchaKind, CaptchaTask, ConfigError, ErrorCatalog, ErrorClass, KnownServiceCode,
    MinScore, ServiceCode, Solution, SolverSettings, TaskId,
};
