use axum::{
    Router,
    routing::{get, post},
};

use crate::app::{SharedManager, errors};

pub mod simulation;
pub mod system;
pub mod views;

/// Router for all simulation endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/run-step", post(simulation::run_step))
        .route("/reset", post(simulation::reset))
        .route("/report", get(simulation::report))
        .route("/inventory", get(views::inventory))
        .route("/orders", get(views::orders))
        .route("/customers", get(views::customers))
        .route("/restocks", get(views::restocks))
}

/// Run `f` against the manager under the global lock.
pub(crate) fn with_manager<T>(
    manager: &SharedManager,
    f: impl FnOnce(&mut bookstore_simulation::SimulationManager) -> T,
) -> Result<T, axum::response::Response> {
    let mut guard = manager.lock().map_err(|_| errors::lock_poisoned())?;
    Ok(f(&mut guard))
}
