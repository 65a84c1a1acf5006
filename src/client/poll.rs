//! The request → parse → classify → retry-or-fail loop shared by every phase.

use std::fmt;
use std::time::Duration;

use url::Url;

use super::{HttpResponse, HttpTransport, TwoCaptchaError};
use crate::domain::{ErrorCatalog, ErrorClass, KnownServiceCode, ResponseStatus, ServiceCode};
use crate::transport::decode_service_json_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Step of the solving protocol a request belongs to.
pub enum Phase {
    BalanceCheck,
    TaskCreation,
    SolutionPolling,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BalanceCheck => "balance check",
            Self::TaskCreation => "task creation",
            Self::SolutionPolling => "solution polling",
        })
    }
}

pub(crate) struct PollLoop<'a> {
    pub(crate) http: &'a dyn HttpTransport,
    pub(crate) catalog: &'a ErrorCatalog,
    pub(crate) poll_interval: Duration,
    pub(crate) max_attempts: u32,
}

impl PollLoop<'_> {
    /// Request `url` until the service answers with success or a fatal error.
    ///
    /// A failure is retried only when the catalog classifies it as
    /// [`ErrorClass::RetryAutomatically`] and `retry_on` accepts the code for
    /// this phase. A retryable code that `retry_on` rejects cannot succeed in
    /// this phase and is reported as [`ErrorClass::FatalRequest`]. Gateway
    /// errors (502/503/504) are retried the same way. Every retry sleeps
    /// `poll_interval`; at most `max_attempts` requests are made.
    pub(crate) async fn run<F>(
        &self,
        phase: Phase,
        url: &Url,
        retry_on: F,
    ) -> Result<String, TwoCaptchaError>
    where
        F: Fn(KnownServiceCode) -> bool,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let response = self
                .http
                .get(url)
                .await
                .map_err(TwoCaptchaError::Transport)?;

            if is_unavailable(response.status) {
                if attempt >= self.max_attempts {
                    return Err(TwoCaptchaError::AttemptsExhausted {
                        phase,
                        attempts: attempt,
                        last_code: None,
                    });
                }
                tracing::debug!(%phase, attempt, status = response.status, "service unavailable, retrying");
                tokio::time::sleep(self.poll_interval).await;
                continue;
            }
            if !(200..=299).contains(&response.status) {
                return Err(http_status_error(response));
            }

            let parsed = decode_service_json_response(&response.body).map_err(|err| {
                TwoCaptchaError::Unparseable {
                    phase,
                    source: Box::new(err),
                }
            })?;

            if parsed.status == ResponseStatus::Success {
                tracing::debug!(%phase, attempt, "request accepted");
                return Ok(parsed.payload);
            }

            let code = ServiceCode::new(parsed.payload);
            let class = match self.catalog.classify(&code) {
                ErrorClass::RetryAutomatically if !code.known().is_some_and(&retry_on) => {
                    ErrorClass::FatalRequest
                }
                class => class,
            };

            if class.is_fatal() {
                tracing::debug!(%phase, attempt, %code, %class, "service rejected request");
                return Err(TwoCaptchaError::Service {
                    phase,
                    code,
                    class,
                    error_text: parsed.error_text,
                });
            }
            if attempt >= self.max_attempts {
                return Err(TwoCaptchaError::AttemptsExhausted {
                    phase,
                    attempts: attempt,
                    last_code: Some(code),
                });
            }

            tracing::debug!(%phase, attempt, %code, "retrying after poll interval");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn is_unavailable(status: u16) -> bool {
    matches!(status, 502..=504)
}

fn http_status_error(response: HttpResponse) -> TwoCaptchaError {
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    TwoCaptchaError::HttpStatus {
        status: response.status,
        body,
    }
}
