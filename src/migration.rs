//! Schema bootstrap: CREATE TABLE IF NOT EXISTS for every catalog entity,
//! generated from the descriptors so the DDL and the API can never disagree.

use crate::catalog::{Catalog, EntityDef};
use crate::error::AppError;
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// DDL for one entity table. Only required columns are NOT NULL: a defaulted
/// optional column stays nullable, so an explicit null in a create or patch
/// stores NULL while an omitted key takes the default. The unique field gets
/// a UNIQUE constraint so concurrent creates cannot both land (the insert
/// itself fails with a unique violation).
pub fn create_table_sql(entity: &EntityDef) -> String {
    let mut defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quote("id"))];
    for c in &entity.columns {
        let mut def = format!("{} {}", quote(c.name), c.kind.pg_type().to_uppercase());
        if c.required {
            def.push_str(" NOT NULL");
        }
        if let Some(d) = &c.default {
            def.push_str(" DEFAULT ");
            def.push_str(&d.sql_literal());
        }
        defs.push(def);
    }
    if let Some(u) = entity.unique {
        defs.push(format!("UNIQUE ({})", quote(u.column)));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(entity.table),
        defs.join(",\n  ")
    )
}

/// Create all entity tables. Idempotent.
pub async fn apply_migrations(pool: &PgPool, catalog: &Catalog) -> Result<(), AppError> {
    for entity in catalog.entities() {
        let sql = create_table_sql(entity);
        tracing::debug!(table = entity.table, "ensuring table");
        sqlx::query(&sql).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    #[test]
    fn product_ddl_has_defaults_and_unique_sku() {
        let cat = catalog();
        let sql = create_table_sql(cat.entity_by_path("products").unwrap());
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"products\""));
        assert!(sql.contains("\"id\" BIGSERIAL PRIMARY KEY"));
        assert!(sql.contains("\"sku\" TEXT NOT NULL"));
        assert!(sql.contains("\"price\" FLOAT8 NOT NULL"));
        assert!(sql.contains("\"status\" TEXT DEFAULT 'In Stock'"));
        assert!(sql.contains("\"image_url\" TEXT DEFAULT ''"));
        assert!(sql.contains("UNIQUE (\"sku\")"));
    }

    #[test]
    fn optional_columns_stay_nullable() {
        let cat = catalog();
        let sql = create_table_sql(cat.entity_by_path("warehouses").unwrap());
        assert!(sql.contains("\"manager\" TEXT,"), "{}", sql);
        assert!(sql.contains("\"current_stock\" BIGINT DEFAULT 0"));
        assert!(!sql.contains("UNIQUE"));
    }

    #[test]
    fn defaulted_optional_columns_are_not_not_null() {
        // An explicit null must be storable in any non-required column, even
        // when it carries a default for the omitted case.
        let cat = catalog();
        for path in ["products", "warehouses", "categories", "customers", "staff"] {
            let entity = cat.entity_by_path(path).unwrap();
            let sql = create_table_sql(entity);
            for c in &entity.columns {
                let not_null = sql.contains(&format!("\"{}\" {} NOT NULL", c.name, c.kind.pg_type().to_uppercase()));
                assert_eq!(not_null, c.required, "{}.{}", path, c.name);
            }
        }
        // required-with-default keeps both clauses
        let sql = create_table_sql(cat.entity_by_path("products").unwrap());
        assert!(sql.contains("\"stock\" BIGINT NOT NULL DEFAULT 0"));
    }

    #[test]
    fn staff_ddl_uses_date_and_unique_email() {
        let cat = catalog();
        let sql = create_table_sql(cat.entity_by_path("staff").unwrap());
        assert!(sql.contains("\"join_date\" DATE NOT NULL"));
        assert!(sql.contains("\"salary\" FLOAT8 NOT NULL"));
        assert!(sql.contains("UNIQUE (\"email\")"));
    }
}
