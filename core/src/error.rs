//! Error taxonomy for the thesis management client.
//!
//! # Design
//! Every failure a caller can observe is one of five kinds. Classification
//! happens once, when a response (or the lack of one) comes back from the
//! transport; services pass the result through untouched. The kinds are
//! variants of a single enum rather than a type hierarchy, so callers match
//! on them directly.
//!
//! Raw response bodies are kept as parsed JSON. A body that is not valid JSON
//! is kept as a JSON string so nothing the server said is lost.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;
use crate::messages;

/// Message used when a transport failure carries no description.
pub const NETWORK_ERROR_FALLBACK: &str = "Network error";

/// Errors returned by every client operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Catch-all: transport failures (no status) and unmapped status codes.
    #[error("{message}")]
    Api {
        message: String,
        status: Option<u16>,
        body: Option<Value>,
    },

    /// The server returned 401.
    #[error("{message}")]
    Authentication { message: String },

    /// The server returned 403.
    #[error("{message}")]
    Authorization { message: String },

    /// The server returned 404.
    #[error("{message}")]
    NotFound { message: String },

    /// The server returned 400 or 422. `errors` is the raw response body.
    #[error("{message}")]
    Validation {
        message: String,
        status: u16,
        errors: Value,
    },
}

/// Discriminant of [`ApiError`], for callers that only care about the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Api,
    Authentication,
    Authorization,
    NotFound,
    Validation,
}

impl ApiError {
    /// No response was received (DNS failure, refused connection, timeout).
    pub fn network(description: impl Into<String>) -> Self {
        let description = description.into();
        let message = if description.trim().is_empty() {
            NETWORK_ERROR_FALLBACK.to_string()
        } else {
            description
        };
        ApiError::Api {
            message,
            status: None,
            body: None,
        }
    }

    /// Classify a response by status code.
    ///
    /// Callers only pass non-2xx responses here; a 2xx status would land in
    /// the generic kind like any other unmapped code.
    pub fn from_response(response: &HttpResponse) -> Self {
        let status = response.status;
        let body = raw_body(&response.body);
        let message = extract_message(body.as_ref(), status);

        match status {
            401 => ApiError::Authentication { message },
            403 => ApiError::Authorization { message },
            404 => ApiError::NotFound { message },
            400 | 422 => ApiError::Validation {
                message,
                status,
                errors: body.unwrap_or(Value::Null),
            },
            _ => ApiError::Api {
                message,
                status: Some(status),
                body,
            },
        }
    }

    /// A 2xx response whose body does not match the expected shape.
    pub fn decode(response: &HttpResponse, err: serde_json::Error) -> Self {
        ApiError::Api {
            message: format!("failed to decode response body: {err}"),
            status: Some(response.status),
            body: raw_body(&response.body),
        }
    }

    /// The request payload could not be serialized.
    pub fn serialization(err: serde_json::Error) -> Self {
        ApiError::Api {
            message: format!("failed to serialize request body: {err}"),
            status: None,
            body: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Api { .. } => ErrorKind::Api,
            ApiError::Authentication { .. } => ErrorKind::Authentication,
            ApiError::Authorization { .. } => ErrorKind::Authorization,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Validation { .. } => ErrorKind::Validation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Api { message, .. }
            | ApiError::Authentication { message }
            | ApiError::Authorization { message }
            | ApiError::NotFound { message }
            | ApiError::Validation { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => *status,
            ApiError::Authentication { .. } => Some(401),
            ApiError::Authorization { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Validation { status, .. } => Some(*status),
        }
    }

    /// Raw response body. Only the generic and validation kinds carry one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Api { body, .. } => body.as_ref(),
            ApiError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn validation_errors(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// User-facing message for this error as reported by `endpoint`.
    pub fn user_message(&self, endpoint: &str) -> &'static str {
        messages::error_message(endpoint, self.status())
    }
}

fn raw_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

fn extract_message(body: Option<&Value>, status: u16) -> String {
    let field = |name: &str| {
        body.and_then(|b| b.get(name))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    field("detail")
        .or_else(|| field("message"))
        .unwrap_or_else(|| format!("Request failed with status code {status}"))
}
