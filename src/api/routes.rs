//! API route configuration.

use crate::api::handlers::{
    create_redirection_handler, delete_redirection_handler, get_redirection_handler,
    list_redirections_handler, redirection_count_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Redirection management routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET    /redirections`             - List all redirections
/// - `POST   /redirections`             - Create a redirection
/// - `GET    /redirections/{key}`       - Describe a redirection
/// - `DELETE /redirections/{key}`       - Delete a redirection
/// - `GET    /redirections/{key}/count` - Visit count
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/redirections",
            get(list_redirections_handler).post(create_redirection_handler),
        )
        .route(
            "/redirections/{key}",
            get(get_redirection_handler).delete(delete_redirection_handler),
        )
        .route("/redirections/{key}/count", get(redirection_count_handler))
}
