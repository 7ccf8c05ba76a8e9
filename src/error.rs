//! Typed errors, backend error classification and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid identifier specified: '{0}'.")]
    InvalidIdentifier(String),
    #[error("No {0} specified.")]
    MissingParameter(&'static str),
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("{0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Backend(String),
}

/// Whether an error is worth an operator's attention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Routine,
    LogWorthy,
}

/// Whether the failing statement read or wrote. Input rejections only exist on writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

const ROW_NOT_FOUND: &str = "Row not found.";
const RESOURCE_NOT_FOUND: &str = "Resource not found.";

impl AppError {
    pub fn row_not_found() -> Self {
        AppError::NotFound(ROW_NOT_FOUND.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidIdentifier(_) => "invalid_identifier",
            AppError::MissingParameter(_) => "missing_parameter",
            AppError::MalformedPayload(_) => "malformed_payload",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation_error",
            AppError::Backend(_) => "database_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidIdentifier(_) | AppError::MissingParameter(_) | AppError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classifies a backend error raised by a read or a write.
    pub fn classify(e: sqlx::Error, access: Access) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::row_not_found(),
            sqlx::Error::Database(db) => {
                let message = db.message().to_string();
                match db.code().as_deref() {
                    Some(code) => classify_sqlstate(code, message, access),
                    None => AppError::Backend(message),
                }
            }
            _ => AppError::Backend(e.to_string()),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AppError::Backend(_) => Severity::LogWorthy,
            _ => Severity::Routine,
        }
    }
}

/// `?` on a mutation path. Reads go through `AppError::classify(e, Access::Read)`.
impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::classify(e, Access::Write)
    }
}

/// SQLSTATE classes: 22 data exception, 23 integrity constraint, 42P01 undefined table, 42703 undefined column.
fn classify_sqlstate(code: &str, message: String, access: Access) -> AppError {
    match (code, access) {
        ("42P01", _) => AppError::NotFound(RESOURCE_NOT_FOUND.into()),
        ("42703", Access::Write) => AppError::Validation(message),
        (c, Access::Write) if c.starts_with("22") || c.starts_with("23") => AppError::Validation(message),
        _ => AppError::Backend(message),
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedPayload(e.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    pub fn from_error(e: &AppError) -> Self {
        ErrorBody {
            error: ErrorDetail {
                status: e.status().as_u16(),
                code: e.code().to_string(),
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.severity() {
            Severity::LogWorthy => tracing::error!(code = self.code(), error = %self, "request failed"),
            Severity::Routine => tracing::debug!(code = self.code(), error = %self, "request rejected"),
        }
        (self.status(), Json(ErrorBody::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn row_not_found_is_not_found() {
        let e = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(e, AppError::NotFound(ref m) if m == "Row not found."));
        assert_eq!(e.status(), StatusCode::NOT_FOUND);
        assert_eq!(e.severity(), Severity::Routine);
    }

    #[test]
    fn sqlstate_classes_map_to_taxonomy() {
        let w = Access::Write;
        assert!(matches!(classify_sqlstate("42P01", "x".into(), w), AppError::NotFound(_)));
        assert!(matches!(classify_sqlstate("23505", "dup".into(), w), AppError::Validation(ref m) if m == "dup"));
        assert!(matches!(classify_sqlstate("23502", "null".into(), w), AppError::Validation(_)));
        assert!(matches!(classify_sqlstate("22P02", "bad int".into(), w), AppError::Validation(_)));
        assert!(matches!(classify_sqlstate("42703", "no column".into(), w), AppError::Validation(_)));
        assert!(matches!(classify_sqlstate("42601", "syntax".into(), w), AppError::Backend(ref m) if m == "syntax"));
        assert!(matches!(classify_sqlstate("08006", "gone".into(), w), AppError::Backend(_)));
    }

    #[test]
    fn read_side_rejections_are_backend_errors() {
        let r = Access::Read;
        assert!(matches!(classify_sqlstate("42P01", "x".into(), r), AppError::NotFound(_)));
        for code in ["42703", "22P02", "22012", "23505"] {
            let e = classify_sqlstate(code, "boom".into(), r);
            assert!(matches!(e, AppError::Backend(ref m) if m == "boom"), "{}", code);
            assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn read_classification_keeps_row_not_found() {
        let e = AppError::classify(sqlx::Error::RowNotFound, Access::Read);
        assert!(matches!(e, AppError::NotFound(ref m) if m == "Row not found."));
    }

    #[test]
    fn connectivity_failures_are_backend_errors() {
        let e = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(e, AppError::Backend(_)));
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.severity(), Severity::LogWorthy);
    }

    #[test]
    fn json_errors_are_malformed_payloads() {
        let e: AppError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(e.code(), "malformed_payload");
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn error_body_is_structured() {
        let body = serde_json::to_value(ErrorBody::from_error(&AppError::row_not_found())).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": {"status": 404, "code": "not_found", "message": "Row not found."}})
        );
    }

    #[test]
    fn fail_fast_errors_are_bad_requests() {
        assert_eq!(AppError::InvalidIdentifier("a;b".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingParameter("id").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingParameter("id").to_string(), "No id specified.");
    }
}
