use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when using the BigQuery client
#[derive(Debug, Error)]
pub enum BigQueryError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// API error returned by BigQuery (invalid SQL, permissions, missing tables, ...)
    #[error("{0}")]
    Api(ApiErrorObject),

    /// Configuration error (e.g., missing credentials or project)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(String),
}

/// Error object from the Google API error envelope (`{"error": {...}}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorObject {
    /// HTTP status code
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
    /// Canonical status string (e.g. `INVALID_ARGUMENT`)
    #[serde(default)]
    pub status: Option<String>,
}

impl std::fmt::Display for ApiErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, self.status.as_deref()) {
            (Some(code), Some(status)) => {
                write!(f, "BigQuery API error ({code} {status}): {}", self.message)
            }
            (Some(code), None) => write!(f, "BigQuery API error ({code}): {}", self.message),
            _ => write!(f, "BigQuery API error: {}", self.message),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorObject,
}

/// Maps a serde deserialization error to a `BigQueryError` with context
#[must_use]
pub fn map_deser(e: &serde_json::Error, body: &[u8]) -> BigQueryError {
    let snippet = String::from_utf8_lossy(&body[..body.len().min(400)]).to_string();
    BigQueryError::Serde(format!("{e}: {snippet}"))
}

/// Deserializes an API error from the response body
///
/// Attempts to parse the Google error envelope, falling back to plain text on failure.
#[must_use]
pub fn deserialize_api_error(status: StatusCode, body: &[u8]) -> BigQueryError {
    if let Ok(mut env) = serde_json::from_slice::<ErrorEnvelope>(body) {
        env.error.code = Some(status.as_u16());
        return BigQueryError::Api(env.error);
    }

    // Proxies may return plain text or HTML; cap body to avoid log/memory bloat
    BigQueryError::Api(ApiErrorObject {
        code: Some(status.as_u16()),
        message: String::from_utf8_lossy(&body[..body.len().min(400)]).into_owned(),
        status: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_google_error_envelope() {
        let body = br#"{"error": {"code": 400, "message": "Syntax error: Unexpected end of script at [1:7]", "status": "INVALID_ARGUMENT", "errors": [{"reason": "invalidQuery"}]}}"#;
        let err = deserialize_api_error(StatusCode::BAD_REQUEST, body);
        assert_eq!(
            err.to_string(),
            "BigQuery API error (400 INVALID_ARGUMENT): Syntax error: Unexpected end of script at [1:7]"
        );
    }

    #[test]
    fn plain_text_body_is_capped() {
        let body = vec![b'x'; 1000];
        let BigQueryError::Api(obj) = deserialize_api_error(StatusCode::BAD_GATEWAY, &body) else {
            panic!("expected Api error");
        };
        assert_eq!(obj.code, Some(502));
        assert_eq!(obj.message.len(), 400);
        assert!(obj.status.is_none());
    }
}
