use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use simplerest_auth::Realm;
use simplerest_infra::ResourceError;

use crate::app::errors;
use crate::context::RequestPrincipal;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AuthState {
    pub realm: Arc<Realm>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("authorization header is not valid ASCII")]
    NotAscii,
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
    #[error("credentials are not valid base64")]
    Encoding,
    #[error("credentials must be 'username:password'")]
    Format,
}

/// Resolve the request principal from HTTP Basic credentials.
///
/// No `Authorization` header yields an anonymous principal and the request
/// proceeds; the resource decides whether that is enough. A header that is
/// malformed or names unknown credentials is rejected here with 401.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = match extract_basic(req.headers()) {
        Ok(None) => None,
        Ok(Some((username, password))) => match state.realm.authenticate(&username, &password) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::info!(username = %username, error = %e, "authentication failed");
                return errors::resource_error_to_response(ResourceError::Unauthenticated);
            }
        },
        Err(e) => {
            tracing::info!(error = %e, "malformed credentials");
            return errors::resource_error_to_response(ResourceError::Unauthenticated);
        }
    };

    req.extensions_mut().insert(RequestPrincipal::new(principal));
    next.run(req).await
}

fn extract_basic(headers: &HeaderMap) -> Result<Option<(String, String)>, CredentialError> {
    let Some(header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| CredentialError::NotAscii)?;

    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(CredentialError::UnsupportedScheme)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(CredentialError::UnsupportedScheme);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| CredentialError::Encoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| CredentialError::Encoding)?;

    let (username, password) = decoded.split_once(':').ok_or(CredentialError::Format)?;
    Ok(Some((username.to_string(), password.to_string())))
}

/// Wrap each request in a span carrying a fresh request id and echo the id
/// back in `x-request-id`.
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "request",
        %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::info!(status = res.status().as_u16(), "request completed");
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
