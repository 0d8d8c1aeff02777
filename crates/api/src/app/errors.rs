use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde_json::json;

use simplerest_infra::ResourceError;

pub const WWW_AUTHENTICATE_CHALLENGE: &str = r#"Basic realm="simplerest""#;

/// Single mapping from the failure taxonomy to HTTP.
///
/// Every handler and middleware funnels failures through here, so the status
/// codes and the `{"error", "message"}` body shape stay uniform.
pub fn resource_error_to_response(err: ResourceError) -> axum::response::Response {
    match err {
        ResourceError::NotFound(key) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no entity with key '{key}'"),
        ),
        ResourceError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, "bad_request", msg),
        ResourceError::Unauthenticated => {
            let mut res = json_error(
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "authentication required",
            );
            res.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
            );
            res
        }
        ResourceError::Forbidden(perm) => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("missing permission '{perm}'"),
        ),
        ResourceError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
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

/// Undecodable request bodies are the caller's fault.
pub fn from_json_rejection(rejection: JsonRejection) -> ResourceError {
    ResourceError::BadRequest(rejection.body_text())
}
