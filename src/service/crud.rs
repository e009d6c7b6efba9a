//! Generic CRUD execution against PostgreSQL.

use crate::catalog::EntityDef;
use crate::error::AppError;
use crate::sql::{delete, insert, select_by_id, select_list, update, PgBindValue, QueryBuf};
use serde_json::Value;
use sqlx::PgPool;
use std::collections::HashMap;

pub struct CrudService;

impl CrudService {
    /// All rows of the entity, ordered by id. No pagination.
    pub async fn list(pool: &PgPool, entity: &EntityDef) -> Result<Vec<Value>, AppError> {
        let q = select_list(entity);
        Self::query_many(pool, &q).await
    }

    /// Fetch one row by id. Returns JSON object or None.
    pub async fn read(
        pool: &PgPool,
        entity: &EntityDef,
        id: i64,
    ) -> Result<Option<Value>, AppError> {
        let mut q = select_by_id(entity);
        q.params.push(Value::Number(id.into()));
        Self::query_optional(pool, &q).await
    }

    /// Insert one row; the store assigns the id and fills declared defaults.
    /// A unique-constraint violation is the authoritative conflict signal and
    /// maps to the entity's unique-field label.
    pub async fn create(
        pool: &PgPool,
        entity: &EntityDef,
        body: &HashMap<String, Value>,
    ) -> Result<Value, AppError> {
        let q = insert(entity, body);
        match Self::query_optional(pool, &q).await {
            Ok(Some(row)) => Ok(row),
            Ok(None) => Err(AppError::Db(sqlx::Error::RowNotFound)),
            Err(AppError::Db(e)) if is_unique_violation(&e) => {
                let label = entity.unique.map(|u| u.label).unwrap_or("record");
                Err(AppError::Conflict(label.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Update one row by id, overwriting only the supplied fields. Returns the
    /// full updated row, or None when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        entity: &EntityDef,
        id: i64,
        body: &HashMap<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let q = update(entity, id, body);
        Self::query_optional(pool, &q).await
    }

    /// Delete one row by id. Returns false when the id does not exist.
    pub async fn delete(pool: &PgPool, entity: &EntityDef, id: i64) -> Result<bool, AppError> {
        let mut q = delete(entity);
        q.params.push(Value::Number(id.into()));
        let row = Self::query_optional(pool, &q).await?;
        Ok(row.is_some())
    }

    async fn query_optional(pool: &PgPool, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let row = query.fetch_optional(pool).await?;
        Ok(row.map(|r| row_to_json(&r)))
    }

    async fn query_many(pool: &PgPool, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(PgBindValue::from_json(p));
        }
        let rows = query.fetch_all(pool).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

/// SQLSTATE 23505: unique_violation.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    Value::Null
}
