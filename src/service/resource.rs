//! Generic resource operations against PostgreSQL.

use crate::error::{Access, AppError};
use crate::marshal;
use crate::response::TableSummary;
use crate::sql::{self, Identifier, QueryBuf, RowId};
use serde_json::{Map, Value};
use sqlx::{Executor, PgConnection, PgPool, Statement};

pub struct ResourceService;

impl ResourceService {
    /// Every user table with its approximate row count.
    pub async fn catalog(pool: &PgPool) -> Result<Vec<TableSummary>, AppError> {
        let q = sql::catalog();
        tracing::debug!(sql = %q.sql, "query");
        sqlx::query_as::<_, TableSummary>(&q.sql)
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::classify(e, Access::Read))
    }

    /// All rows of a table. An empty table is an empty collection, not an error.
    pub async fn list_all(pool: &PgPool, table: &Identifier) -> Result<Vec<Value>, AppError> {
        let q = sql::select_all(table);
        let raw = Self::fetch_scalar(pool, &q).await?;
        marshal::to_collection(raw.as_deref())
    }

    /// One row by id, or `NotFound`.
    pub async fn get_one(pool: &PgPool, table: &Identifier, id: &RowId) -> Result<Value, AppError> {
        let q = sql::select_by_id(table, id);
        let raw = Self::fetch_scalar(pool, &q).await?;
        marshal::to_document(raw.as_deref())?.ok_or_else(AppError::row_not_found)
    }

    /// Insert the document as a new row; columns it omits take their defaults.
    pub async fn create(pool: &PgPool, table: &Identifier, document: &str) -> Result<(), AppError> {
        let doc = marshal::parse_object(document)?;
        let columns = marshal::document_columns(&doc)?;
        let q = sql::insert(table, &columns, document);
        Self::execute_in_transaction(pool, &q).await?;
        Ok(())
    }

    /// Change only the columns named in the document. Returns the affected row count.
    pub async fn update(pool: &PgPool, table: &Identifier, id: &RowId, document: &str) -> Result<u64, AppError> {
        let mut doc = marshal::parse_object(document)?;
        strip_matching_id(&mut doc, id)?;
        if doc.is_empty() {
            return Err(AppError::MalformedPayload("nothing to update".into()));
        }
        let fields = marshal::field_assignments(&doc)?;
        let q = sql::update(table, id, &fields);
        Self::execute_in_transaction(pool, &q).await
    }

    /// Delete by id. Returns the affected row count; callers decide what zero means.
    pub async fn delete(pool: &PgPool, table: &Identifier, id: &RowId) -> Result<u64, AppError> {
        let q = sql::delete(table, id);
        Self::execute_in_transaction(pool, &q).await
    }

    /// Single nullable text column of a single row. No row at all surfaces as `RowNotFound`.
    async fn fetch_scalar(pool: &PgPool, q: &QueryBuf) -> Result<Option<String>, AppError> {
        tracing::debug!(sql = %q.sql, params = q.params.len(), "query");
        let mut query = sqlx::query_scalar::<_, Option<String>>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query.fetch_one(pool).await.map_err(|e| AppError::classify(e, Access::Read))
    }

    /// Begin, prepare, bind and execute, then commit. Any failure rolls the transaction back.
    /// Dropping the future mid-flight drops the transaction, which also rolls back.
    async fn execute_in_transaction(pool: &PgPool, q: &QueryBuf) -> Result<u64, AppError> {
        let mut tx = pool.begin().await?;
        match prepare_and_execute(&mut tx, q).await {
            Ok(affected) => {
                tx.commit().await?;
                Ok(affected)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(e.into())
            }
        }
    }
}

async fn prepare_and_execute(conn: &mut PgConnection, q: &QueryBuf) -> Result<u64, sqlx::Error> {
    tracing::debug!(sql = %q.sql, params = q.params.len(), "query (tx)");
    let statement = (&mut *conn).prepare(q.sql.as_str()).await?;
    let mut query = statement.query();
    for p in &q.params {
        query = query.bind(p.clone());
    }
    let result = query.execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

/// The path decides which row is updated. An `id` field equal to it is dropped; a different one is rejected.
/// Numbers compare by value, so `1.0` in the body matches a path id of `1`.
fn strip_matching_id(doc: &mut Map<String, Value>, id: &RowId) -> Result<(), AppError> {
    let Some(value) = doc.get("id") else { return Ok(()) };
    let same = match value {
        Value::String(s) => s == id.as_str(),
        Value::Number(n) => {
            n.to_string() == id.as_str()
                || matches!((n.as_f64(), id.as_str().parse::<f64>()), (Some(a), Ok(b)) if a == b)
        }
        _ => false,
    };
    if !same {
        return Err(AppError::Validation("id cannot be changed".into()));
    }
    doc.remove("id");
    Ok(())
}
