use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::routes::with_manager;
use crate::app::{SharedManager, dto, errors};

pub async fn run_step(
    Extension(manager): Extension<SharedManager>,
    payload: Result<Json<dto::RunStepRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::json_error(rejection.status(), "validation_error", rejection.body_text()),
    };
    let steps = body.steps;

    // Ticks block on the store and reasoner; keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        with_manager(&manager, |m| {
            m.advance(body.steps, body.reasoner_sync_interval, body.random_seed)
                .map_err(errors::sim_error_to_response)
        })?
    })
    .await;

    match outcome {
        Ok(Ok(step_count)) => (
            StatusCode::OK,
            Json(dto::RunStepResponse {
                steps_advanced: steps,
                step_count,
            }),
        )
            .into_response(),
        Ok(Err(response)) => response,
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string()),
    }
}

pub async fn reset(Extension(manager): Extension<SharedManager>) -> Response {
    let outcome = tokio::task::spawn_blocking(move || {
        with_manager(&manager, |m| m.reset().map_err(errors::sim_error_to_response))?
    })
    .await;

    match outcome {
        Ok(Ok(step_count)) => Json(dto::ResetResponse {
            step_count,
            message: "Simulation reset".to_string(),
        })
        .into_response(),
        Ok(Err(response)) => response,
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string()),
    }
}

/// Forces a reasoner sync before summarising, so this is not a pure read.
pub async fn report(Extension(manager): Extension<SharedManager>) -> Response {
    let outcome = tokio::task::spawn_blocking(move || with_manager(&manager, |m| m.report())).await;

    match outcome {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(response)) => response,
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string()),
    }
}
