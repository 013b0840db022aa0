use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use workflow::{BackendError, FieldErrors};

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Error body sent by the backend.
///
/// Field errors arrive either as a single message or as a list of messages
/// per field; only the first one is kept.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub errors: Option<Map<String, Value>>,
}

impl ErrorBody {
    /// The field errors, if the body carried any.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        let errors: FieldErrors = self
            .errors
            .as_ref()?
            .iter()
            .filter_map(|(field, value)| {
                let message = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(list) => list.iter().find_map(Value::as_str).map(str::to_string),
                    _ => None,
                };
                message.map(|m| (field.clone(), m))
            })
            .collect();

        (!errors.is_empty()).then_some(errors)
    }

    /// The single message, if the body carried one.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

/// The central error type of the HTTP client.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request never got an answer.
    #[error("request failed")]
    Transport(
        #[source]
        #[from]
        reqwest::Error,
    ),

    /// The backend rejected one or more fields.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The backend answered with a non-success status.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    /// A success response whose body did not have the expected shape.
    #[error("unexpected response body")]
    Decode(
        #[source]
        #[from]
        serde_json::Error,
    ),
}

impl ApiError {
    /// Classifies a non-success response.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();

        if let Some(errors) = parsed.field_errors() {
            return ApiError::Validation(errors);
        }

        let message = parsed.message().map_or_else(
            || {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response")
                    .to_string()
            },
            str::to_string,
        );

        ApiError::Status { status, message }
    }
}

impl From<ApiError> for BackendError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(errors) => BackendError::Validation(errors),
            ApiError::Status { message, .. } => BackendError::General(message),
            ApiError::Transport(err) => BackendError::Network(err.to_string()),
            ApiError::Decode(err) => {
                BackendError::Network(format!("unexpected response body: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_and_string_field_errors() {
        let body = br#"{
            "message": "The given data was invalid.",
            "errors": {
                "schedule_id": ["Kuota jadwal sudah penuh.", "second"],
                "chief_complaint": "Keluhan utama wajib diisi.",
                "ignored": 3
            }
        }"#;

        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        let ApiError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.get("schedule_id"), Some("Kuota jadwal sudah penuh."));
        assert_eq!(errors.get("chief_complaint"), Some("Keluhan utama wajib diisi."));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn message_only_body_is_general() {
        let body = br#"{"error":"Server error"}"#;
        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(BackendError::from(err), BackendError::General("Server error".into()));
    }

    #[test]
    fn unrecognized_body_falls_back_to_status_reason() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(BackendError::from(err), BackendError::General("Bad Gateway".into()));

        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, br#"{"errors":{}}"#);
        assert!(matches!(err, ApiError::Status { .. }));
    }
}
