use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bookstore_simulation::SimError;

pub fn sim_error_to_response(err: SimError) -> axum::response::Response {
    match err {
        SimError::Validation(msg) => json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg),
        SimError::Persistence(e) => {
            tracing::error!("persistence failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", e.to_string())
        }
        SimError::Store(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string()),
        SimError::Config(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg),
    }
}

pub fn lock_poisoned() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "unavailable",
        "simulation state is unavailable after a previous failure",
    )
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
