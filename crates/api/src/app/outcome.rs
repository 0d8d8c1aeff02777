//! Rendering of controller outcomes as HTTP responses.

use std::fmt::Display;

use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use simplerest_core::Entity;
use simplerest_infra::{Outcome, ResourceError};

use crate::app::errors;

/// Absolute URL of the collection a request addressed, without a trailing
/// slash. Entity links are formed by appending one key segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionUrl(String);

impl CollectionUrl {
    /// Resolve from the configured public base URL, or from the request
    /// `Host` header over plain http when none is configured.
    pub fn resolve(
        public_base_url: Option<&str>,
        headers: &HeaderMap,
        uri: &Uri,
    ) -> Result<Self, ResourceError> {
        let base = match public_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let host = headers
                    .get(header::HOST)
                    .and_then(|h| h.to_str().ok())
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| {
                        ResourceError::Internal("cannot build location: no Host header".into())
                    })?;
                format!("http://{host}")
            }
        };

        let url = format!("{base}{}", uri.path().trim_end_matches('/'));
        let parsed: Uri = url
            .parse()
            .map_err(|e| ResourceError::Internal(format!("malformed location '{url}': {e}")))?;
        if parsed.scheme().is_none() || parsed.authority().is_none() {
            return Err(ResourceError::Internal(format!(
                "location '{url}' is not absolute"
            )));
        }

        Ok(Self(url))
    }

    /// Link to the entity stored under `key`.
    pub fn entity(&self, key: &impl Display) -> Result<HeaderValue, ResourceError> {
        let location = format!("{}/{}", self.0, urlencoding::encode(&key.to_string()));
        HeaderValue::from_str(&location)
            .map_err(|e| ResourceError::Internal(format!("malformed location '{location}': {e}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize)]
struct Listing<V> {
    items: Vec<V>,
}

/// Render an outcome.
///
/// `Created` and `Updated` carry a `Location` header when `collection` is
/// given. An empty listing is an empty `items` array with 200.
pub fn outcome_to_response<V>(
    outcome: Outcome<V>,
    collection: Option<&CollectionUrl>,
) -> axum::response::Response
where
    V: Entity + Serialize,
{
    match outcome {
        Outcome::Found(entity) => (StatusCode::OK, Json(entity)).into_response(),
        Outcome::Listed(items) => (StatusCode::OK, Json(Listing { items })).into_response(),
        Outcome::Created(key) => with_location(StatusCode::CREATED, collection, &key),
        Outcome::Updated(key) => with_location(StatusCode::NO_CONTENT, collection, &key),
        Outcome::Deleted => StatusCode::NO_CONTENT.into_response(),
    }
}

fn with_location(
    status: StatusCode,
    collection: Option<&CollectionUrl>,
    key: &impl Display,
) -> axum::response::Response {
    let Some(collection) = collection else {
        return status.into_response();
    };
    match collection.entity(key) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(e) => errors::resource_error_to_response(e),
    }
}

/// Render a controller result, translating failures.
pub fn respond<V>(
    result: Result<Outcome<V>, ResourceError>,
    collection: Option<&CollectionUrl>,
) -> axum::response::Response
where
    V: Entity + Serialize,
{
    match result {
        Ok(outcome) => outcome_to_response(outcome, collection),
        Err(e) => errors::resource_error_to_response(e),
    }
}
