//! Handlers for the redirection management API.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::redirection::{
    CreateRedirectionRequest, RedirectionCountRepresentation, RedirectionListRepresentation,
    RedirectionRepresentation, consume_path,
};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new redirection under a generated key.
///
/// # Endpoint
///
/// `POST /api/redirections`
///
/// # Request Body
///
/// ```json
/// { "location": "https://example.com" }
/// ```
///
/// # Response
///
/// **201 Created** with `Location: /{key}` and:
///
/// ```json
/// {
///   "key": "dd5w3b",
///   "location": "https://example.com",
///   "_links": {
///     "self": { "href": "/api/redirections/dd5w3b" },
///     "count": { "href": "/api/redirections/dd5w3b/count" },
///     "consume": { "href": "/dd5w3b" }
///   }
/// }
/// ```
///
/// # Errors
///
/// - **400 Bad Request**: location is not an absolute URL
/// - **409 Conflict**: no free key found within the configured attempts
pub async fn create_redirection_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateRedirectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let key = state
        .redirection_service
        .create_redirection(&payload.location)
        .await?;

    let body = RedirectionRepresentation::from_key(key.clone()).with_location(payload.location);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, consume_path(&key))],
        Json(body),
    ))
}

/// Lists every registered redirection.
///
/// # Endpoint
///
/// `GET /api/redirections`
pub async fn list_redirections_handler(
    State(state): State<AppState>,
) -> Result<Json<RedirectionListRepresentation>, AppError> {
    let keys = state.redirection_service.list_redirections().await?;

    Ok(Json(RedirectionListRepresentation::from_keys(keys)))
}

/// Describes one redirection without counting a visit.
///
/// # Endpoint
///
/// `GET /api/redirections/{key}`
pub async fn get_redirection_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RedirectionRepresentation>, AppError> {
    let redirection = state.redirection_service.get_redirection(&key).await?;

    Ok(Json(
        RedirectionRepresentation::from_key(redirection.key()).with_location(redirection.location()),
    ))
}

/// Deletes a redirection.
///
/// # Endpoint
///
/// `DELETE /api/redirections/{key}`
///
/// # Response Codes
///
/// - **204 No Content**: Deleted
/// - **404 Not Found**: Unknown key
pub async fn delete_redirection_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.redirection_service.delete_redirection(&key).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns how many times a redirection was followed.
///
/// # Endpoint
///
/// `GET /api/redirections/{key}/count`
///
/// The count is eventually consistent: a visit shows up once the dispatcher
/// delivered its event to the event store.
pub async fn redirection_count_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RedirectionCountRepresentation>, AppError> {
    let count = state.redirection_service.get_redirection_count(&key).await?;

    Ok(Json(RedirectionCountRepresentation::new(&key, count)))
}
