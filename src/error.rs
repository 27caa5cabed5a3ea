//! # Error Handling
//!
//! Unified problem+json error responses with trace ID propagation, plus the
//! domain errors raised by the achievement pipeline.

use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::telemetry;

/// Unified API error response structure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip_serializing, skip_deserializing)]
    pub status: StatusCode,
    /// Error code for programmatic handling
    pub code: Box<str>,
    /// Human-readable error message
    pub message: Box<str>,
    /// Additional error details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<serde_json::Value>>,
    /// Suggested retry delay in seconds (optional)
    pub retry_after: Option<u64>,
    /// Correlation trace ID for debugging (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<Box<str>>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new<S: Into<String>>(status: StatusCode, code: S, message: S) -> Self {
        Self {
            status,
            code: code.into().into_boxed_str(),
            message: message.into().into_boxed_str(),
            details: None,
            retry_after: None,
            trace_id: Self::current_trace_id(),
        }
    }

    /// Add details to the error
    pub fn with_details<V: Into<serde_json::Value>>(mut self, details: V) -> Self {
        self.details = Some(Box::new(details.into()));
        self
    }

    /// Set retry after delay
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Extract current trace ID from the active tracing span (falls back to generated correlation ID)
    fn current_trace_id() -> Option<Box<str>> {
        telemetry::current_trace_id()
            .map(|trace_id| trace_id.into_boxed_str())
            .or_else(|| {
                // Fallback: generate a correlation ID for basic client-server log correlation
                Some(format!("corr-{}", &uuid::Uuid::new_v4().to_string()[..8]).into_boxed_str())
            })
    }
}

fn is_unique_violation(error: &sea_orm::DbErr) -> bool {
    use sea_orm::RuntimeErr;

    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let runtime_err = match error {
        sea_orm::DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | sea_orm::DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    db_error.is_unique_violation()
        || db_error.code().is_some_and(|code| {
            let code = code.as_ref();
            code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code)
        })
}

/// Standard error types with predefined status codes
#[derive(Debug, Error)]
pub enum ErrorType {
    #[error("Internal Server Error")]
    InternalServerError,
    #[error("Service Unavailable")]
    ServiceUnavailable,
}

impl ErrorType {
    /// Get the appropriate HTTP status code for this error type
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorType::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error code string for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorType::InternalServerError => "INTERNAL_SERVER_ERROR",
            ErrorType::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/problem+json"),
        );

        // Add Retry-After header if present
        if let Some(retry_after) = self.retry_after
            && let Ok(header_value) = HeaderValue::from_str(&retry_after.to_string())
        {
            headers.insert("retry-after", header_value);
        }

        (self.status, headers, axum::Json(self)).into_response()
    }
}

// Error mappers for common sources

impl From<ErrorType> for ApiError {
    fn from(error_type: ErrorType) -> Self {
        Self::new(
            error_type.status_code(),
            error_type.error_code(),
            &error_type.to_string(),
        )
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        // Log the full error for debugging
        tracing::error!("Internal error: {:?}", error);

        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "An internal error occurred",
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Missing 'Content-Type: application/json' header".to_string()
            }
            _ => "Invalid request body".to_string(),
        };

        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", &message)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(error: sea_orm::DbErr) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, "Unique constraint violation detected");
            return Self::new(StatusCode::CONFLICT, "CONFLICT", "Resource already exists");
        }

        match error {
            sea_orm::DbErr::RecordNotFound(record) => Self::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                &format!("Record not found: {}", record),
            ),
            sea_orm::DbErr::Query(query_err) => {
                tracing::error!("Database query error: {:?}", query_err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Database error occurred",
                )
            }
            sea_orm::DbErr::Exec(exec_err) => {
                tracing::error!("Database execution error: {:?}", exec_err);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Database error occurred",
                )
            }
            sea_orm::DbErr::Conn(connection_err) => {
                tracing::error!("Database connection error: {:?}", connection_err);
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Database service unavailable",
                )
                .with_retry_after(5)
            }
            _ => {
                tracing::error!("Database error: {:?}", error);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Database error occurred",
                )
            }
        }
    }
}

/// Create an unauthorized error (401)
pub fn unauthorized(message: Option<&str>) -> ApiError {
    let msg = message.unwrap_or("Authentication required");
    ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg)
}

/// Create an unauthorized error (401) with explicit trace_id
pub fn unauthorized_with_trace_id(message: Option<&str>, trace_id: String) -> ApiError {
    let msg = message.unwrap_or("Authentication required");
    let mut error = ApiError::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg);
    error.trace_id = Some(trace_id.into_boxed_str());
    error
}

/// Create a validation error with field details
pub fn validation_error(message: &str, field_errors: serde_json::Value) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message).with_details(field_errors)
}

/// Failures raised by the achievement pipeline.
#[derive(Debug, Error)]
pub enum AchievementError {
    /// The authenticated user has no backing row.
    #[error("user {0} not found")]
    UserNotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// Writing an awarded achievement failed.
    #[error("failed to persist achievement '{name}': {source}")]
    Persistence {
        name: String,
        #[source]
        source: sea_orm::DbErr,
    },
}

impl From<AchievementError> for ApiError {
    fn from(error: AchievementError) -> Self {
        // Clients only ever see the generic envelope; details stay in the logs.
        tracing::error!(error = %error, "Achievement pipeline failed");
        ErrorType::InternalServerError.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_api_error_basic() {
        let error = ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "Test error message",
        );

        assert_eq!(error.code, Box::from("VALIDATION_FAILED"));
        assert_eq!(error.message, Box::from("Test error message"));
        assert_eq!(error.details, None);
        assert_eq!(error.retry_after, None);
    }

    #[test]
    fn test_api_error_with_details() {
        let error = ApiError::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Test error message")
            .with_details(json!({"field": "value"}));

        assert_eq!(error.details, Some(Box::new(json!({"field": "value"}))));
    }

    #[test]
    fn test_error_type_mapping() {
        let unavailable: ApiError = ErrorType::ServiceUnavailable.into();
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unavailable.code, Box::from("SERVICE_UNAVAILABLE"));
        assert_eq!(unavailable.message, Box::from("Service Unavailable"));
    }

    #[test]
    fn test_from_anyhow() {
        let api_error: ApiError = anyhow::anyhow!("Something went wrong").into();

        assert_eq!(api_error.code, Box::from("INTERNAL_SERVER_ERROR"));
        assert_eq!(api_error.message, Box::from("An internal error occurred"));
    }

    #[test]
    fn test_content_type_header() {
        let response =
            ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", "Test error").into_response();

        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/problem+json"
        );
    }

    #[test]
    fn test_retry_after_header() {
        let response = ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "SERVICE_UNAVAILABLE",
            "Database service unavailable",
        )
        .with_retry_after(5)
        .into_response();

        assert_eq!(response.headers().get("retry-after").unwrap(), "5");
    }

    #[test]
    fn test_trace_id_generation() {
        let error = ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "Test error",
        );

        let trace_id = error.trace_id.unwrap();
        assert!(trace_id.starts_with("corr-"));
        assert_eq!(trace_id.len(), 13);
    }

    #[tokio::test]
    async fn test_trace_id_taken_from_active_context() {
        let error = telemetry::with_trace_context(
            telemetry::TraceContext {
                trace_id: "req-77".to_string(),
            },
            async { unauthorized(None) },
        )
        .await;

        assert_eq!(error.trace_id.as_deref(), Some("req-77"));
    }

    #[test]
    fn test_database_error_mapping() {
        let api_error: ApiError = sea_orm::DbErr::RecordNotFound("job".to_string()).into();

        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert!(api_error.message.contains("job"));
    }

    #[tokio::test]
    async fn test_sqlite_unique_violation_maps_to_conflict() {
        use sea_orm::{ConnectionTrait, Database, Statement};

        let db = Database::connect("sqlite::memory:").await.unwrap();
        let backend = db.get_database_backend();
        for sql in [
            "CREATE TABLE names (name TEXT NOT NULL UNIQUE)",
            "INSERT INTO names (name) VALUES ('Committed')",
        ] {
            db.execute(Statement::from_string(backend, sql.to_string()))
                .await
                .unwrap();
        }

        let error = db
            .execute(Statement::from_string(
                backend,
                "INSERT INTO names (name) VALUES ('Committed')".to_string(),
            ))
            .await
            .unwrap_err();

        assert!(is_unique_violation(&error));
        let api_error: ApiError = error.into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.code, Box::from("CONFLICT"));
    }

    #[test]
    fn test_achievement_errors_surface_as_generic_500() {
        for error in [
            AchievementError::UserNotFound(Uuid::new_v4()),
            AchievementError::Persistence {
                name: "Applied to 10 Jobs".to_string(),
                source: sea_orm::DbErr::Custom("boom".to_string()),
            },
        ] {
            let api_error: ApiError = error.into();
            assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(api_error.message, Box::from("Internal Server Error"));
            assert!(api_error.details.is_none());
        }
    }

    #[test]
    fn test_unauthorized_helpers() {
        let auth_error = unauthorized(None);
        assert_eq!(auth_error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(auth_error.message, Box::from("Authentication required"));

        let with_trace = unauthorized_with_trace_id(Some("Session expired"), "t-1".to_string());
        assert_eq!(with_trace.message, Box::from("Session expired"));
        assert_eq!(with_trace.trace_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_validation_error_with_details() {
        let field_errors = json!({ "jobsAppliedToDaysPerWeekGoal": "out of range" });

        let error = validation_error("Invalid goal", field_errors.clone());

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, Box::from("VALIDATION_FAILED"));
        assert_eq!(error.details, Some(Box::new(field_errors)));
    }
}
