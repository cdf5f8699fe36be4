//! Normalized failures of the API facade.
//!
//! Every call ends in one [`ApiError`], and every `ApiError` can produce a
//! message fit for a toast or an inline error line via [`ApiError::user_message`].

use serde_json::Value;
use thiserror::Error;

/// Shown for any failure where no response was received.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Data could not be loaded. Please check your connection and try again.";

pub const GENERIC_ERROR_MESSAGE: &str = "Request failed";

/// Raw response text longer than this is not shown to the user.
pub const MAX_RAW_MESSAGE_CHARS: usize = 200;

/// Body of a non-2xx response, classified by where the message was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// `{"detail": {"message": ...}}` or `{"detail": "..."}`
    Detail(String),
    /// `{"message": ...}`
    Message(String),
    /// A non-JSON body or a bare JSON string, kept verbatim.
    Text(String),
    /// JSON without a recognizable message, e.g. a validation error list.
    Unrecognized,
    Empty,
}

impl ErrorBody {
    /// Classifies a raw body: `detail.message`, then a string `detail`, then
    /// `message`. Raw text is only kept when the body is not a JSON object.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ErrorBody::Empty;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                if let Some(message) = value.pointer("/detail/message").and_then(Value::as_str) {
                    return ErrorBody::Detail(message.to_string());
                }
                if let Some(message) = value.get("detail").and_then(Value::as_str) {
                    return ErrorBody::Detail(message.to_string());
                }
                if let Some(message) = value.get("message").and_then(Value::as_str) {
                    return ErrorBody::Message(message.to_string());
                }
                if let Some(text) = value.as_str() {
                    return ErrorBody::Text(text.to_string());
                }
                ErrorBody::Unrecognized
            }
            Err(_) => ErrorBody::Text(trimmed.to_string()),
        }
    }

    /// The human-readable part of the body, if there is one worth showing.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorBody::Detail(message) | ErrorBody::Message(message) if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            ErrorBody::Text(text) if text.chars().count() <= MAX_RAW_MESSAGE_CHARS => Some(text.as_str()),
            _ => None,
        }
    }
}

fn server_message(status: &u16, body: &ErrorBody) -> String {
    body.message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}: {}", GENERIC_ERROR_MESSAGE, status))
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was received. The transport detail is kept for logs only.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network(String),

    #[error("{}", server_message(.status, .body))]
    Server { status: u16, body: ErrorBody },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    Request(String),
}

impl ApiError {
    /// Message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Server { status, body } => server_message(status, body),
            ApiError::Decode(_) | ApiError::Request(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            ApiError::Request(error.to_string())
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_message_wins() {
        let body = ErrorBody::parse(r#"{"detail": {"message": "Category already exists"}, "message": "Bad"}"#);
        assert_eq!(body, ErrorBody::Detail("Category already exists".to_string()));
        assert_eq!(body.message(), Some("Category already exists"));
    }

    #[test]
    fn test_string_detail_and_top_level_message() {
        assert_eq!(
            ErrorBody::parse(r#"{"detail": "Not found"}"#),
            ErrorBody::Detail("Not found".to_string())
        );
        assert_eq!(
            ErrorBody::parse(r#"{"success": false, "message": "Name too long"}"#),
            ErrorBody::Message("Name too long".to_string())
        );
    }

    #[test]
    fn test_raw_text_only_when_short() {
        let short = ErrorBody::parse("Service Unavailable");
        assert_eq!(short.message(), Some("Service Unavailable"));

        let long = ErrorBody::parse(&"x".repeat(MAX_RAW_MESSAGE_CHARS + 1));
        assert_eq!(long.message(), None);

        let error = ApiError::Server { status: 502, body: long };
        assert_eq!(error.user_message(), "Request failed: 502");
    }

    #[test]
    fn test_json_without_message_is_not_shown() {
        let validation = ErrorBody::parse(
            r#"{"detail": [{"loc": ["body", "amount"], "msg": "field required", "type": "value_error.missing"}]}"#,
        );
        assert_eq!(validation, ErrorBody::Unrecognized);
        assert_eq!(validation.message(), None);

        let error = ApiError::Server {
            status: 400,
            body: ErrorBody::parse(r#"{"error": "boom", "code": "E1"}"#),
        };
        assert_eq!(error.user_message(), "Request failed: 400");

        assert_eq!(
            ErrorBody::parse(r#""Quota exceeded""#).message(),
            Some("Quota exceeded")
        );
    }

    #[test]
    fn test_empty_body_falls_back_to_generic() {
        let error = ApiError::Server {
            status: 500,
            body: ErrorBody::parse("   "),
        };
        assert_eq!(error.to_string(), "Request failed: 500");
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_network_message_hides_transport_detail() {
        let error = ApiError::Network("tcp connect error: Connection refused".to_string());
        assert_eq!(error.user_message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(error.to_string(), NETWORK_ERROR_MESSAGE);
        assert!(error.is_network());
    }
}
