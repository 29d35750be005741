use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use clientdesk_core::AppError;

/// Render an application error as its taxonomy status + JSON body.
pub fn app_error_to_response(err: AppError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match err {
        AppError::NotFound(msg) => json_error(status, "not_found", msg),
        AppError::Validation { message, details } => {
            let mut body = json!({
                "error": "validation_error",
                "message": message,
            });
            if let Some(details) = details {
                body["details"] = details;
            }
            (status, axum::Json(body)).into_response()
        }
        AppError::Duplicate(msg) => json_error(status, "duplicate", msg),
        AppError::Database(msg) => {
            tracing::error!("storage failure: {msg}");
            json_error(status, "database_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
