//! Item API
//!
//! Create and update take `multipart/form-data`: text fields `name`,
//! `category`, `variations` (JSON array), `replaceImages`, and any number
//! of `images` file parts.

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::core::ServerState;

/// Body limit for item forms (several images per request)
const ITEM_FORM_LIMIT: usize = 25 * 1024 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", item_routes())
}

fn item_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(DefaultBodyLimit::max(ITEM_FORM_LIMIT))
}
