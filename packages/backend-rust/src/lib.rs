pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod store;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::store::WordStore;

/// App over an explicitly constructed store; `main` wires a
/// Postgres-backed one from the environment, tests an in-memory one.
pub fn app_with_store(store: WordStore) -> axum::Router {
    let state = AppState::new(store);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
