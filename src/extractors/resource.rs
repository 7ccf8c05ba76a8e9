//! Extract and validate the `:table` and optional `:id` path segments.

use crate::error::AppError;
use crate::sql::{Identifier, RowId};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;

/// Table and optional row id taken from the request path. Construction fails before the handler runs
/// when the table name is not a valid identifier or the id is empty.
#[derive(Clone, Debug)]
pub struct ResourcePath {
    pub table: Identifier,
    pub id: Option<RowId>,
}

impl ResourcePath {
    pub fn require_id(&self) -> Result<&RowId, AppError> {
        self.id.as_ref().ok_or(AppError::MissingParameter("id"))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ResourcePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::MissingParameter("resource"))?;
        let table = Identifier::parse(params.get("table").map(String::as_str).unwrap_or_default())?;
        let id = params.get("id").map(|s| RowId::parse(s)).transpose()?;
        Ok(ResourcePath { table, id })
    }
}
