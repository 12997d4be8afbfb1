use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crowdfund_core::error::CoreError;
use serde::Serialize;

/// Error returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; sqlx errors are classified by
/// SQLSTATE and constraint name when the response is built.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// JSON error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_CHECK_VIOLATION: &str = "23514";

const INTERNAL_MESSAGE: &str = "An internal error occurred";

type Parts = (StatusCode, &'static str, String);

fn internal() -> Parts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl AppError {
    fn parts(&self) -> Parts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn core_parts(err: &CoreError) -> Parts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        // A stored project broke a ledger invariant; the caller cannot fix it.
        CoreError::InvalidConfiguration(msg) => {
            tracing::error!(error = %msg, "Invalid stored configuration");
            internal()
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Client-facing message for a known unique constraint.
fn duplicate_message(constraint: &str) -> String {
    match constraint {
        "uq_users_username" => "Username is already taken".into(),
        "uq_users_email" => "Email is already registered".into(),
        "uq_categories_slug" => "A category with this slug already exists".into(),
        "uq_tags_name" => "A tag with this name already exists".into(),
        "uq_project_ratings_project_user" => "You have already rated this project".into(),
        "uq_project_reports_project_user" => "You have already reported this project".into(),
        "uq_project_reports_comment_user" => "You have already reported this comment".into(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Map a sqlx error onto a status, code and message.
///
/// `RowNotFound` is 404, a `uq_*` unique violation 409, a `ck_*` check
/// violation 400 and a foreign key violation 400. Anything else is logged
/// and answered with a generic 500.
fn classify_sqlx_error(err: &sqlx::Error) -> Parts {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some(PG_UNIQUE_VIOLATION) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            duplicate_message(constraint),
        ),
        Some(PG_CHECK_VIOLATION) if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        Some(PG_FOREIGN_KEY_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Referenced record does not exist: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, constraint, "Database error");
            internal()
        }
    }
}
