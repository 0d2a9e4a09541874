use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use service::employee::{parse_id, Employee, EmployeePatch, NewEmployee};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Serialize)]
pub struct Removed {
    pub removed: Employee,
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(ct) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Request body as JSON. A missing body, or one not declared as JSON, reads as
/// `{}`; a declared-JSON body that does not parse is a 400.
fn body(headers: &HeaderMap, raw: &Bytes) -> Result<Value, JsonApiError> {
    if !is_json(headers) || raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(raw).map_err(|e| JsonApiError::bad_request(format!("invalid JSON payload: {e}")))
}

fn id_from_path(raw: &str) -> Result<u64, JsonApiError> {
    parse_id(raw).ok_or_else(JsonApiError::not_found)
}

#[utoipa::path(
    get, path = "/api/employees", tag = "employees",
    responses(
        (status = 200, description = "All records in store order", body = [crate::openapi::EmployeeDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Employee>>, JsonApiError> {
    state
        .employees
        .list()
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("error reading store", e))
}

#[utoipa::path(
    post, path = "/api/employees", tag = "employees",
    request_body = crate::openapi::NewEmployeeDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::EmployeeDoc),
        (status = 400, description = "Missing or invalid field", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    headers: HeaderMap,
    raw: Bytes,
) -> Result<(StatusCode, Json<Employee>), JsonApiError> {
    let input = NewEmployee::from_payload(&body(&headers, &raw)?)
        .map_err(|e| JsonApiError::from_service("error creating record", e))?;
    let created = state
        .employees
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service("error creating record", e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/employees/{id}", tag = "employees",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = crate::openapi::EmployeePatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::EmployeeDoc),
        (status = 400, description = "Invalid field", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Unknown id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    raw: Bytes,
) -> Result<Json<Employee>, JsonApiError> {
    let id = id_from_path(&raw_id)?;
    let patch = EmployeePatch::from_payload(&body(&headers, &raw)?)
        .map_err(|e| JsonApiError::from_service("error updating record", e))?;
    state
        .employees
        .update(id, patch)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("error updating record", e))
}

#[utoipa::path(
    delete, path = "/api/employees/{id}", tag = "employees",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Removed record", body = crate::openapi::RemovedDoc),
        (status = 404, description = "Unknown id", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Removed>, JsonApiError> {
    let id = id_from_path(&raw_id)?;
    state
        .employees
        .delete(id)
        .await
        .map(|removed| Json(Removed { removed }))
        .map_err(|e| JsonApiError::from_service("error deleting record", e))
}
