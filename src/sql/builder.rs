//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from an entity descriptor.

use crate::catalog::EntityDef;
use serde_json::Value;
use std::collections::HashMap;

/// Quote identifier for PostgreSQL (safe: names come only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// All data columns plus id, in catalog order.
fn select_column_list(entity: &EntityDef) -> String {
    let mut cols = vec![quoted("id")];
    cols.extend(entity.columns.iter().map(|c| quoted(c.name)));
    cols.join(", ")
}

/// SELECT every row, ordered by id for stable output.
pub fn select_list(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(entity),
        quoted(entity.table),
        quoted("id")
    );
    q
}

/// SELECT by surrogate id. Caller binds the id as sole param.
pub fn select_by_id(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(entity),
        quoted(entity.table),
        quoted("id")
    );
    q
}

/// INSERT from body: one placeholder per known column, cast to the column's
/// declared type. Columns the body omits are skipped entirely when they have a
/// declared default (the database fills them) or are optional (NULL).
/// Unknown body keys are ignored. Returns the full created row.
pub fn insert(entity: &EntityDef, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in &entity.columns {
        let Some(val) = body.get(c.name) else { continue };
        let n = q.push_param(val.clone());
        cols.push(quoted(c.name));
        placeholders.push(format!("${}::{}", n, c.kind.pg_type()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(entity.table),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(entity)
    );
    q
}

/// UPDATE by id: SET only columns present in body, skipping unknown keys and
/// non-updatable columns. An empty effective SET degrades to a SELECT by id so
/// the caller still gets the (unchanged) row back.
pub fn update(entity: &EntityDef, id: i64, body: &HashMap<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &entity.columns {
        if !c.updatable {
            continue;
        }
        let Some(val) = body.get(c.name) else { continue };
        let n = q.push_param(val.clone());
        sets.push(format!("{} = ${}::{}", quoted(c.name), n, c.kind.pg_type()));
    }
    if sets.is_empty() {
        let mut fallback = select_by_id(entity);
        fallback.params.push(Value::Number(id.into()));
        return fallback;
    }
    let id_param = q.push_param(Value::Number(id.into()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(entity.table),
        sets.join(", "),
        quoted("id"),
        id_param,
        select_column_list(entity)
    );
    q
}

/// DELETE by id. Caller binds the id as sole param. RETURNING id distinguishes
/// a deleted row from a miss.
pub fn delete(entity: &EntityDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        quoted(entity.table),
        quoted("id"),
        quoted("id")
    );
    q
}
