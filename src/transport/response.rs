use serde::Deserialize;

use super::payload::TransportPayload;
use crate::domain::{ResponseStatus, ServiceResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i64")]
enum TransportStatus {
    Failure,
    Success,
}

impl TryFrom<i64> for TransportStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Failure),
            1 => Ok(Self::Success),
            other => Err(format!("unexpected status value: {other}")),
        }
    }
}

impl From<TransportStatus> for ResponseStatus {
    fn from(value: TransportStatus) -> Self {
        match value {
            TransportStatus::Failure => ResponseStatus::Failure,
            TransportStatus::Success => ResponseStatus::Success,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceJsonResponse {
    status: TransportStatus,
    request: TransportPayload,
    #[serde(default)]
    error_text: Option<String>,
}

pub fn decode_service_json_response(json: &str) -> Result<ServiceResponse, TransportError> {
    let parsed: ServiceJsonResponse = serde_json::from_str(json)?;
    Ok(ServiceResponse {
        status: parsed.status.into(),
        payload: parsed.request.into_string(),
        error_text: parsed.error_text.filter(|text| !text.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_success_envelope() {
        let parsed = decode_service_json_response(r#"{"status":1,"request":"2122988149"}"#).unwrap();
        assert_eq!(parsed.status, ResponseStatus::Success);
        assert_eq!(parsed.payload, "2122988149");
        assert_eq!(parsed.error_text, None);
    }

    #[test]
    fn decode_failure_envelope_keeps_error_text() {
        let json = r#"
        {
          "status": 0,
          "request": "ERROR_WRONG_USER_KEY",
          "error_text": "You've provided key parameter value in incorrect format"
        }
        "#;

        let parsed = decode_service_json_response(json).unwrap();
        assert_eq!(parsed.status, ResponseStatus::Failure);
        assert_eq!(parsed.payload, "ERROR_WRONG_USER_KEY");
        assert!(parsed.error_text.is_some());
    }

    #[test]
    fn decode_numeric_balance_payload() {
        let parsed = decode_service_json_response(r#"{"status":1,"request":3.75}"#).unwrap();
        assert_eq!(parsed.payload, "3.75");
    }

    #[test]
    fn decode_numeric_task_id_payload() {
        let parsed = decode_service_json_response(r#"{"status":1,"request":2122988149}"#).unwrap();
        assert_eq!(parsed.payload, "2122988149");
    }

    #[test]
    fn decode_rejects_malformed_bodies() {
        for body in [
            "OK|2122988149",
            r#"{"status":1,"requ"#,
            "",
            r#"{"status":2,"request":"x"}"#,
            r#"{"status":1}"#,
        ] {
            assert!(
                decode_service_json_response(body).is_err(),
                "accepted malformed body: {body:?}"
            );
        }
    }
}
