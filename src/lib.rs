//! Inventory API: CRUD backend for products, warehouses, categories,
//! customers, and staff over PostgreSQL.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use catalog::{catalog, Catalog, EntityDef};
pub use error::AppError;
pub use migration::apply_migrations;
pub use routes::{common_routes, entity_routes};
pub use service::{CrudService, RequestValidator};
pub use settings::Settings;
pub use state::AppState;
pub use store::ensure_database_exists;

use axum::Router;

/// Full application router: common routes plus entity CRUD.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state))
}
