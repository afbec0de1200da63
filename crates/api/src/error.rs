use serde::Deserialize;
use thiserror::Error;

use homzhub_core::errors::ApplicationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api error ({status_code}): {message}")]
    Api { status_code: u16, message: String },
    #[error("attachment rejected: {0}")]
    UploadRejected(String),
    #[error("could not read attachment `{name}`: {message}")]
    FileRead { name: String, message: String },
    #[error("response decode failed: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    details: Option<ErrorDetails>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    message: Option<String>,
    #[serde(rename = "statusCode")]
    status_code: Option<u16>,
}

impl ApiError {
    /// Single normalization point for backend error bodies. Every non-2xx
    /// response is expected to carry `{ details: { message, statusCode } }`;
    /// bodies that do not match fall back to the HTTP status line.
    pub fn from_response_body(http_status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { details: Some(details) }) => Self::Api {
                status_code: details.status_code.unwrap_or(http_status),
                message: details
                    .message
                    .unwrap_or_else(|| format!("request failed with status {http_status}")),
            },
            _ => Self::Api {
                status_code: http_status,
                message: format!("request failed with status {http_status}"),
            },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

impl From<ApiError> for ApplicationError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::UploadRejected(message) => ApplicationError::Upload(message),
            ApiError::FileRead { name, message } => {
                ApplicationError::Upload(format!("could not read attachment `{name}`: {message}"))
            }
            other => ApplicationError::Integration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use homzhub_core::errors::ApplicationError;

    use super::ApiError;

    #[test]
    fn error_envelope_is_normalized_to_message_and_status() {
        let error = ApiError::from_response_body(
            400,
            r#"{"details":{"message":"Quote request already fulfilled","statusCode":409}}"#,
        );

        assert!(matches!(
            error,
            ApiError::Api { status_code: 409, ref message }
                if message == "Quote request already fulfilled"
        ));
        assert_eq!(error.status_code(), Some(409));
    }

    #[test]
    fn malformed_bodies_fall_back_to_the_http_status() {
        let error = ApiError::from_response_body(502, "<html>Bad Gateway</html>");

        assert!(matches!(
            error,
            ApiError::Api { status_code: 502, ref message }
                if message == "request failed with status 502"
        ));
    }

    #[test]
    fn envelope_without_details_uses_fallback_message() {
        let error = ApiError::from_response_body(500, r#"{"error":"boom"}"#);

        assert!(matches!(error, ApiError::Api { status_code: 500, .. }));
    }

    #[test]
    fn upload_rejections_map_to_upload_application_errors() {
        let application = ApplicationError::from(ApiError::UploadRejected("file corrupt".into()));
        assert_eq!(application, ApplicationError::Upload("file corrupt".to_string()));

        let application =
            ApplicationError::from(ApiError::from_response_body(503, "unavailable"));
        assert!(matches!(application, ApplicationError::Integration(_)));
    }
}
