//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: controllers, stores and the realm shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `outcome.rs`: controller outcomes to responses, `Location` links
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::middleware;

pub mod errors;
pub mod outcome;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let realm = services::load_realm(config)?;
    let services = Arc::new(AppServices::new(config, realm)?);
    Ok(build_router(services))
}

/// Router over already constructed services.
pub fn build_router(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        realm: services.realm.clone(),
    };

    // Resource routes: credentials, when sent, must be valid.
    let resources = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(resources)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        )))
}
