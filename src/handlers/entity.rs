//! Entity CRUD handlers: create, list, read, update, delete.
//! Each handler resolves the entity descriptor from the path segment, so one
//! set of handlers serves all five resources.

use crate::catalog::EntityDef;
use crate::error::AppError;
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::collections::HashMap;

fn resolve_entity<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a EntityDef, AppError> {
    state
        .catalog
        .entity_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(path_segment.to_string()))
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let rows = CrudService::list(&state.pool, entity).await?;
    Ok(Json(rows))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, entity)?;
    let row = CrudService::create(&state.pool, entity, &body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(&state.pool, entity, id)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.name.to_string()))?;
    Ok(Json(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, entity)?;
    let row = CrudService::update(&state.pool, entity, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(entity.name.to_string()))?;
    Ok(Json(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let entity = resolve_entity(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    if !CrudService::delete(&state.pool, entity, id).await? {
        return Err(AppError::NotFound(entity.name.to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
