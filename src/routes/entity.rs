//! Entity CRUD routes. One parameterized route set serves every resource in
//! the catalog; handlers resolve the entity by path segment. Collection routes
//! are registered with and without a trailing slash.

use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn entity_routes(state: AppState) -> Router {
    Router::new()
        .route("/:path_segment", get(list).post(create))
        .route("/:path_segment/", get(list).post(create))
        .route(
            "/:path_segment/:id",
            get(read).patch(update).delete(delete_handler),
        )
        .with_state(state)
}
