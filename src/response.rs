//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// One entry of the catalog: a table and its approximate live row count.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct TableSummary {
    pub resource: String,
    pub count: i64,
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope { data }))
}
