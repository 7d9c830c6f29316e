use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::auth::{Claims, Operation};
use crate::database::models::{Employee, EmployeeFields};
use crate::extract::{Json, Path};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/employees
pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<Employee>> {
    state.policy.require(&claims, Operation::List)?;
    let employees = state.employees.list().await?;
    Ok(ApiResponse::success(employees))
}

/// GET /api/v1/employee/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> ApiResult<Employee> {
    state.policy.require(&claims, Operation::Get)?;
    Ok(ApiResponse::success(state.employees.get(id).await?))
}

/// POST /api/v1/employee/:id - register the id with a blank record
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> ApiResult<Employee> {
    state.policy.require(&claims, Operation::Create)?;
    Ok(ApiResponse::created(state.employees.create(id).await?))
}

/// DELETE /api/v1/employee/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> ApiResult<Value> {
    state.policy.require(&claims, Operation::Delete)?;
    state.employees.delete(id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}

/// PATCH /api/v1/employee/:id - fill in a blank record, once
pub async fn patch(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(fields): Json<EmployeeFields>,
) -> ApiResult<Employee> {
    state.policy.require(&claims, Operation::Update)?;
    Ok(ApiResponse::success(state.employees.modify(id, fields).await?))
}

/// PUT /api/v1/employee/:id - overwrite every field
pub async fn put(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(fields): Json<EmployeeFields>,
) -> ApiResult<Employee> {
    state.policy.require(&claims, Operation::Update)?;
    Ok(ApiResponse::success(state.employees.replace(id, fields).await?))
}
