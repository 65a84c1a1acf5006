//! Client layer: validates configuration, drives the solving protocol and maps
//! transport ↔ domain.

mod poll;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    ApiKey, CaptchaKind, CaptchaTask, ConfigError, DEFAULT_MAX_ATTEMPTS, ErrorCatalog, ErrorClass,
    KnownServiceCode, SETTING_MAX_ATTEMPTS, SETTING_POLL_INTERVAL, ServiceCode, Solution,
    SolverSettings, TaskId,
};
use crate::transport::{
    build_url, encode_balance_query, encode_create_task_query, encode_solution_query,
};

pub use poll::Phase;
use poll::PollLoop;

const DEFAULT_REQUEST_ENDPOINT: &str = "https://2captcha.com/in.php";
const DEFAULT_RESULT_ENDPOINT: &str = "https://2captcha.com/res.php";

/// Boxed future returned by [`HttpTransport`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
/// Status and body of one HTTP exchange.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP capability used by [`CaptchaSolver`].
///
/// The default implementation wraps a `reqwest::Client`. Supply your own via
/// [`CaptchaSolverBuilder::transport`] to control pooling, proxies or TLS.
pub trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: &'a Url,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`CaptchaSolver`].
///
/// Configuration problems, service-level rejections and malformed responses
/// are kept apart so callers can decide what is worth retrying.
pub enum TwoCaptchaError {
    /// Caller-supplied configuration was rejected before any request was sent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// 2captcha answered `status: 0` with a code that is not retried in this phase.
    #[error("service error during {phase}: {code} ({class})")]
    Service {
        phase: Phase,
        code: ServiceCode,
        class: ErrorClass,
        error_text: Option<String>,
    },

    /// Response body was not the expected `{status, request}` JSON.
    #[error("unparseable {phase} response: {source}")]
    Unparseable {
        phase: Phase,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The service kept answering with a retryable code or a gateway error.
    ///
    /// `last_code` is `None` when the final answer was a 502/503/504.
    #[error("gave up on {phase} after {attempts} attempts")]
    AttemptsExhausted {
        phase: Phase,
        attempts: u32,
        last_code: Option<ServiceCode>,
    },

    /// The configured deadline elapsed before a solution arrived.
    #[error("solve did not finish within {limit:?}")]
    DeadlineExceeded { limit: Duration },
}

impl TwoCaptchaError {
    /// Service code carried by this error, if the service produced one.
    pub fn service_code(&self) -> Option<&ServiceCode> {
        match self {
            Self::Service { code, .. } => Some(code),
            Self::AttemptsExhausted { last_code, .. } => last_code.as_ref(),
            _ => None,
        }
    }

    /// `true` when the API key or account cannot be used.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::Service {
                class: ErrorClass::FatalCredential,
                ..
            }
        )
    }
}

#[derive(Clone)]
/// Builder for [`CaptchaSolver`].
///
/// `build` validates settings, checks the key against the account balance and
/// pre-builds the task-creation URL.
pub struct CaptchaSolverBuilder {
    api_key: ApiKey,
    task: CaptchaTask,
    poll_interval: Option<Duration>,
    max_attempts: u32,
    deadline: Option<Duration>,
    request_endpoint: String,
    result_endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    catalog: ErrorCatalog,
}

impl CaptchaSolverBuilder {
    /// Create a builder with the default endpoints and no poll interval.
    pub fn new(api_key: ApiKey, task: CaptchaTask) -> Self {
        Self {
            api_key,
            task,
            poll_interval: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            deadline: None,
            request_endpoint: DEFAULT_REQUEST_ENDPOINT.to_owned(),
            result_endpoint: DEFAULT_RESULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            transport: None,
            catalog: ErrorCatalog::standard(),
        }
    }

    /// Validate string-keyed inputs and prepare a builder.
    ///
    /// Checks run in order: settings, variant, variant parameters, v3 score,
    /// API key. Nothing touches the network.
    pub fn from_settings(
        api_key: &str,
        variant: &str,
        variant_params: &HashMap<String, String>,
        settings: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let settings = SolverSettings::from_map(settings)?;
        let kind = variant.parse::<CaptchaKind>()?;
        let task = CaptchaTask::from_params(kind, variant_params)?;
        let api_key = ApiKey::new(api_key)?;
        Ok(Self::new(api_key, task).settings(settings))
    }

    /// Apply poll interval, attempt bound and deadline at once.
    pub fn settings(mut self, settings: SolverSettings) -> Self {
        self.poll_interval = Some(settings.poll_interval);
        self.max_attempts = settings.max_attempts;
        self.deadline = settings.deadline;
        self
    }

    /// Delay between a retryable response and the next request. Required.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Maximum requests per phase.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Upper bound for each `solve` call.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Override the task-creation endpoint (`in.php`).
    pub fn request_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.request_endpoint = endpoint.into();
        self
    }

    /// Override the result endpoint (`res.php`).
    pub fn result_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.result_endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to each request of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header of the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the default `reqwest` transport.
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: HttpTransport + 'static,
    {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replace the standard error classification.
    ///
    /// A code classified [`ErrorClass::RetryAutomatically`] is retried in any
    /// phase except the two codes that belong to one phase only:
    /// `CAPCHA_NOT_READY` is retried only while polling and
    /// `ERROR_NO_SLOT_AVAILABLE` only while creating the task. Elsewhere they
    /// fail as [`ErrorClass::FatalRequest`].
    pub fn error_catalog(mut self, catalog: ErrorCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Build a [`CaptchaSolver`].
    ///
    /// Errors:
    /// - [`TwoCaptchaError::Config`] when the poll interval is missing or an
    ///   endpoint/attempt bound is invalid (no request is sent),
    /// - the classified [`TwoCaptchaError::Service`] error when the balance
    ///   check fails (e.g. `ERROR_KEY_DOES_NOT_EXIST`, `ERROR_ZERO_BALANCE`).
    pub async fn build(self) -> Result<CaptchaSolver, TwoCaptchaError> {
        let poll_interval = self.poll_interval.ok_or(ConfigError::MissingSetting {
            setting: SETTING_POLL_INTERVAL,
        })?;
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: SETTING_MAX_ATTEMPTS,
                value: "0".to_owned(),
            }
            .into());
        }
        let request_endpoint = parse_endpoint("request-endpoint", &self.request_endpoint)?;
        let result_endpoint = parse_endpoint("result-endpoint", &self.result_endpoint)?;

        let http: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| TwoCaptchaError::Transport(Box::new(err)))?;
                Arc::new(ReqwestTransport { client })
            }
        };

        let solver = CaptchaSolver {
            create_task_url: build_url(
                &request_endpoint,
                &encode_create_task_query(&self.api_key, &self.task),
            ),
            api_key: self.api_key,
            task: self.task,
            settings: SolverSettings {
                poll_interval,
                max_attempts: self.max_attempts,
                deadline: self.deadline,
            },
            result_endpoint,
            catalog: Arc::new(self.catalog),
            http,
        };
        solver.check_balance().await?;
        Ok(solver)
    }
}

fn parse_endpoint(setting: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|_| ConfigError::InvalidSetting {
        setting,
        value: raw.to_owned(),
    })
}

#[derive(Clone)]
/// A configured solver for one CAPTCHA variant and parameter set.
///
/// Immutable after construction. Clones share the transport and catalog, and
/// concurrent `solve` calls are independent of each other.
pub struct CaptchaSolver {
    api_key: ApiKey,
    task: CaptchaTask,
    settings: SolverSettings,
    result_endpoint: Url,
    create_task_url: Url,
    catalog: Arc<ErrorCatalog>,
    http: Arc<dyn HttpTransport>,
}

impl CaptchaSolver {
    /// Start building a solver from typed inputs.
    pub fn builder(api_key: ApiKey, task: CaptchaTask) -> CaptchaSolverBuilder {
        CaptchaSolverBuilder::new(api_key, task)
    }

    /// Validate string-keyed inputs, check the key and build a solver with
    /// the default transport.
    ///
    /// See [`CaptchaSolverBuilder::from_settings`] for the validation order.
    pub async fn construct(
        api_key: &str,
        variant: &str,
        variant_params: &HashMap<String, String>,
        settings: &HashMap<String, String>,
    ) -> Result<Self, TwoCaptchaError> {
        CaptchaSolverBuilder::from_settings(api_key, variant, variant_params, settings)?
            .build()
            .await
    }

    pub fn task(&self) -> &CaptchaTask {
        &self.task
    }

    pub fn settings(&self) -> SolverSettings {
        self.settings
    }

    /// Pre-built `in.php` URL submitted by every solve.
    pub fn create_task_url(&self) -> &Url {
        &self.create_task_url
    }

    /// Create a task and poll until its token is ready.
    ///
    /// `ERROR_NO_SLOT_AVAILABLE` during creation and `CAPCHA_NOT_READY` during
    /// polling are retried after the poll interval; every other service error
    /// aborts. Dropping the returned future cancels the solve.
    ///
    /// Errors:
    /// - [`TwoCaptchaError::Service`] for fatal service codes,
    /// - [`TwoCaptchaError::Unparseable`] for malformed bodies (never retried),
    /// - [`TwoCaptchaError::AttemptsExhausted`] / [`TwoCaptchaError::DeadlineExceeded`]
    ///   when the configured bounds run out.
    pub async fn solve(&self) -> Result<Solution, TwoCaptchaError> {
        match self.settings.deadline {
            Some(limit) => tokio::time::timeout(limit, self.solve_phases())
                .await
                .map_err(|_| TwoCaptchaError::DeadlineExceeded { limit })?,
            None => self.solve_phases().await,
        }
    }

    async fn solve_phases(&self) -> Result<Solution, TwoCaptchaError> {
        let poll = self.poll_loop();

        let raw_id = poll
            .run(Phase::TaskCreation, &self.create_task_url, |code| {
                code != KnownServiceCode::CaptchaNotReady
            })
            .await?;
        let task_id = TaskId::new(raw_id).map_err(|err| TwoCaptchaError::Unparseable {
            phase: Phase::TaskCreation,
            source: Box::new(err),
        })?;
        tracing::debug!(%task_id, kind = %self.task.kind(), "task created");

        let solution_url = build_url(
            &self.result_endpoint,
            &encode_solution_query(&self.api_key, &task_id),
        );
        let token = poll
            .run(Phase::SolutionPolling, &solution_url, |code| {
                code != KnownServiceCode::NoSlotAvailable
            })
            .await?;
        tracing::debug!(%task_id, "task solved");

        Ok(Solution::new(token))
    }

    async fn check_balance(&self) -> Result<(), TwoCaptchaError> {
        let url = build_url(&self.result_endpoint, &encode_balance_query(&self.api_key));
        let balance = self
            .poll_loop()
            .run(Phase::BalanceCheck, &url, |code| {
                !matches!(
                    code,
                    KnownServiceCode::NoSlotAvailable | KnownServiceCode::CaptchaNotReady
                )
            })
            .await?;
        tracing::debug!(%balance, "api key accepted");
        Ok(())
    }

    fn poll_loop(&self) -> PollLoop<'_> {
        PollLoop {
            http: self.http.as_ref(),
            catalog: &self.catalog,
            poll_interval: self.settings.poll_interval,
            max_attempts: self.settings.max_attempts,
        }
    }
}
