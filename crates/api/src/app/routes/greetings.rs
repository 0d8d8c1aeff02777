use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path, rejection::JsonRejection},
    http::HeaderMap,
    routing::get,
};

use simplerest_core::LangCode;
use simplerest_greetings::Greeting;
use simplerest_infra::{Operation, ResourceError};

use crate::app::outcome::{self, CollectionUrl};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_greetings)
                .post(upsert_greeting)
                .delete(delete_all_greetings),
        )
        .route(
            "/:lang",
            get(get_greeting).put(replace_greeting).delete(delete_greeting),
        )
}

fn parse_lang(raw: &str) -> Result<LangCode, ResourceError> {
    raw.parse::<LangCode>().map_err(ResourceError::from)
}

pub async fn list_greetings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    outcome::respond(services.greetings.read_all(principal.get()), None)
}

pub async fn get_greeting(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(lang): Path<String>,
) -> axum::response::Response {
    let result = services
        .greetings
        .authorize(principal.get(), Operation::ReadOne)
        .and_then(|()| parse_lang(&lang))
        .and_then(|lang| services.greetings.read_one(principal.get(), &lang));
    outcome::respond(result, None)
}

/// Replace-or-create at the addressed language: 201 when created, 204 when
/// an existing greeting was overwritten.
pub async fn replace_greeting(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(lang): Path<String>,
    body: Result<Json<Greeting>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = services.greetings.authorize(principal.get(), Operation::Replace) {
        return errors::resource_error_to_response(e);
    }

    let Json(greeting) = match body {
        Ok(b) => b,
        Err(e) => return errors::resource_error_to_response(errors::from_json_rejection(e)),
    };

    let result = parse_lang(&lang)
        .and_then(|lang| services.greetings.replace(principal.get(), &lang, greeting));
    outcome::respond(result, None)
}

/// Replace-or-create keyed by the body's `lang`, answering with a `Location`
/// for the stored greeting either way.
pub async fn upsert_greeting(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Result<Json<Greeting>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = services.greetings.authorize(principal.get(), Operation::Replace) {
        return errors::resource_error_to_response(e);
    }

    let Json(greeting) = match body {
        Ok(b) => b,
        Err(e) => return errors::resource_error_to_response(errors::from_json_rejection(e)),
    };

    let collection =
        match CollectionUrl::resolve(services.public_base_url.as_deref(), &headers, &uri) {
            Ok(c) => c,
            Err(e) => return errors::resource_error_to_response(e),
        };

    let result = services.greetings.upsert(principal.get(), greeting);
    outcome::respond(result, Some(&collection))
}

pub async fn delete_greeting(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(lang): Path<String>,
) -> axum::response::Response {
    let result = services
        .greetings
        .authorize(principal.get(), Operation::DeleteOne)
        .and_then(|()| parse_lang(&lang))
        .and_then(|lang| services.greetings.delete_one(principal.get(), &lang));
    outcome::respond(result, None)
}

pub async fn delete_all_greetings(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    outcome::respond(services.greetings.delete_all(principal.get()), None)
}
