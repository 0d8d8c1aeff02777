use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, OriginalUri, Path, rejection::JsonRejection},
    http::HeaderMap,
    routing::get,
};

use simplerest_core::SequenceId;
use simplerest_employees::{Employee, NewEmployee};
use simplerest_infra::{Operation, ResourceError};

use crate::app::outcome::{self, CollectionUrl};
use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::RequestPrincipal;

pub fn router() -> Router {
    Router::new()
        .route(
            "/",
            get(list_employees)
                .post(create_employee)
                .delete(delete_all_employees),
        )
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

fn parse_id(raw: &str) -> Result<SequenceId, ResourceError> {
    raw.parse::<SequenceId>().map_err(ResourceError::from)
}

// Handlers authorize before touching the path or body, so a caller without
// the capability gets 401/403 whatever it sent.

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    outcome::respond(services.employees.read_all(principal.get()), None)
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result = services
        .employees
        .authorize(principal.get(), Operation::ReadOne)
        .and_then(|()| parse_id(&id))
        .and_then(|id| services.employees.read_one(principal.get(), &id));
    outcome::respond(result, None)
}

/// Create with a server-assigned id; an `id` in the body is ignored.
pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Result<Json<NewEmployee>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = services.employees.authorize(principal.get(), Operation::Create) {
        return errors::resource_error_to_response(e);
    }

    let Json(draft) = match body {
        Ok(b) => b,
        Err(e) => return errors::resource_error_to_response(errors::from_json_rejection(e)),
    };

    let collection =
        match CollectionUrl::resolve(services.public_base_url.as_deref(), &headers, &uri) {
            Ok(c) => c,
            Err(e) => return errors::resource_error_to_response(e),
        };

    let result = services
        .employees
        .create(principal.get(), |id| draft.with_id(id));
    outcome::respond(result, Some(&collection))
}

/// Overwrite an existing employee; the body `id` must match the path.
pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
    body: Result<Json<Employee>, JsonRejection>,
) -> axum::response::Response {
    if let Err(e) = services.employees.authorize(principal.get(), Operation::Update) {
        return errors::resource_error_to_response(e);
    }

    let Json(employee) = match body {
        Ok(b) => b,
        Err(e) => return errors::resource_error_to_response(errors::from_json_rejection(e)),
    };

    let result =
        parse_id(&id).and_then(|id| services.employees.update(principal.get(), &id, employee));
    outcome::respond(result, None)
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let result = services
        .employees
        .authorize(principal.get(), Operation::DeleteOne)
        .and_then(|()| parse_id(&id))
        .and_then(|id| services.employees.delete_one(principal.get(), &id));
    outcome::respond(result, None)
}

pub async fn delete_all_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<RequestPrincipal>,
) -> axum::response::Response {
    outcome::respond(services.employees.delete_all(principal.get()), None)
}
