use axum::{Router, http::Uri, routing::get};

use crate::{error::AppError, state::AppState};

pub mod appointments;
pub mod doc;
pub mod health;
pub mod params;
pub mod patients;
pub mod teeth;
pub mod users;

/// Every resource router, the health check and the API docs, bound to `state`.
/// Transport layers (tracing, limits, CORS) are added by the server binary.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/users", users::router())
        .nest("/patients", patients::router())
        .nest("/appointments", appointments::router())
        .nest("/teeth", teeth::router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route");
    AppError::NotFound("Route")
}
