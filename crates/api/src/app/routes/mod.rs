use axum::{Router, routing::get};

pub mod employees;
pub mod greetings;
pub mod hello;
pub mod system;

/// Router for every resource endpoint (behind the credential middleware).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/employees", employees::router())
        .nest("/greetings", greetings::router())
        .nest("/hello", hello::router())
}
