//! Database bootstrap helpers.

use crate::error::AppError;
use sqlx::ConnectOptions;
use std::str::FromStr;

/// Ensure the database in `database_url` exists; create it if not. Connects to
/// the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await
            .map_err(AppError::Db)?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, name) =
            parse_db_name_from_url("postgres://user:pw@localhost:5432/inventory").unwrap();
        assert_eq!(admin, "postgres://user:pw@localhost:5432/postgres");
        assert_eq!(name, "inventory");
    }

    #[test]
    fn quotes_identifiers_by_doubling_embedded_quotes() {
        assert_eq!(quote_ident("inventory"), "\"inventory\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
        // backslashes are not special inside quoted identifiers
        assert_eq!(quote_ident("a\\b"), "\"a\\b\"");
    }

    #[test]
    fn strips_query_string() {
        let (_, name) =
            parse_db_name_from_url("postgres://localhost/inventory?sslmode=disable").unwrap();
        assert_eq!(name, "inventory");
    }
}
