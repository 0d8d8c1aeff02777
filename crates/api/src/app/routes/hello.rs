//! Plain-text hello endpoints. No authentication involved.

use std::sync::Arc;

use axum::{
    Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use simplerest_infra::ResourceError;

use crate::app::errors;
use crate::app::services::{AppServices, DEFAULT_HELLO};

pub fn router() -> Router {
    Router::new().route("/1", get(say_hello)).route(
        "/2",
        get(get_hello)
            .post(set_hello)
            .put(set_hello)
            .delete(clear_hello),
    )
}

pub async fn say_hello() -> &'static str {
    DEFAULT_HELLO
}

pub async fn get_hello(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.hello.get() {
        Ok(Some(message)) => (StatusCode::OK, message).into_response(),
        Ok(None) => errors::resource_error_to_response(ResourceError::NotFound("hello".into())),
        Err(e) => errors::resource_error_to_response(e.into()),
    }
}

/// Store the body as the new message and echo it.
pub async fn set_hello(
    Extension(services): Extension<Arc<AppServices>>,
    body: String,
) -> axum::response::Response {
    match services.hello.set(body) {
        Ok(message) => (StatusCode::OK, message).into_response(),
        Err(e) => errors::resource_error_to_response(e.into()),
    }
}

pub async fn clear_hello(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.hello.clear() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::resource_error_to_response(e.into()),
    }
}
