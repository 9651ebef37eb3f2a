//! HTTP API application wiring (Axum router + shared manager).
//!
//! - `routes/`: HTTP handlers, one file per area
//! - `dto.rs`: request/response DTOs and mapping from simulation types
//! - `errors.rs`: consistent error responses

use std::sync::{Arc, Mutex};

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use bookstore_simulation::SimulationManager;

pub mod dto;
pub mod errors;
pub mod routes;

/// The single serialisation boundary: every request holds this lock for its
/// whole duration, so a batch of ticks never interleaves with another call.
pub type SharedManager = Arc<Mutex<SimulationManager>>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(manager: SimulationManager) -> Router {
    let shared: SharedManager = Arc::new(Mutex::new(manager));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(shared)))
}
