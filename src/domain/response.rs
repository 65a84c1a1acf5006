#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    Success,
    Failure,
}

/// Decoded `{status, request}` envelope shared by every 2captcha endpoint.
///
/// `payload` holds a task id, a token, a balance or an error code depending on
/// the endpoint and `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: ResponseStatus,
    pub payload: String,
    pub error_text: Option<String>,
}
