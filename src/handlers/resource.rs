//! Resource handlers: catalog, list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::ResourcePath;
use crate::response::success_ok;
use crate::service::ResourceService;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse};

fn body_text(body: &Bytes) -> Result<&str, AppError> {
    std::str::from_utf8(body).map_err(|_| AppError::MalformedPayload("body must be UTF-8".into()))
}

pub async fn catalog(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tables = ResourceService::catalog(&state.pool).await?;
    Ok(success_ok(tables))
}

pub async fn list(State(state): State<AppState>, path: ResourcePath) -> Result<impl IntoResponse, AppError> {
    let rows = ResourceService::list_all(&state.pool, &path.table).await?;
    Ok(success_ok(rows))
}

pub async fn read(State(state): State<AppState>, path: ResourcePath) -> Result<impl IntoResponse, AppError> {
    let id = path.require_id()?;
    let row = ResourceService::get_one(&state.pool, &path.table, id).await?;
    Ok(success_ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    path: ResourcePath,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    ResourceService::create(&state.pool, &path.table, body_text(&body)?).await?;
    Ok(StatusCode::CREATED)
}

pub async fn update(
    State(state): State<AppState>,
    path: ResourcePath,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = path.require_id()?;
    let affected = ResourceService::update(&state.pool, &path.table, id, body_text(&body)?).await?;
    if affected == 0 {
        return Err(AppError::row_not_found());
    }
    Ok(StatusCode::OK)
}

pub async fn delete(State(state): State<AppState>, path: ResourcePath) -> Result<impl IntoResponse, AppError> {
    let id = path.require_id()?;
    let affected = ResourceService::delete(&state.pool, &path.table, id).await?;
    if affected == 0 {
        return Err(AppError::row_not_found());
    }
    Ok(StatusCode::OK)
}
