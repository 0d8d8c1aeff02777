use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::RequestPrincipal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<RequestPrincipal>) -> impl IntoResponse {
    let (name, permissions) = match principal.get() {
        Some(p) => (
            Some(p.principal_id.as_str().to_string()),
            p.grants
                .permissions
                .iter()
                .map(|perm| perm.as_str().to_string())
                .collect::<Vec<_>>(),
        ),
        None => (None, Vec::new()),
    };

    Json(serde_json::json!({
        "principal": name,
        "permissions": permissions,
    }))
}
