//! Handler for following a redirection.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a key to its stored location.
///
/// # Endpoint
///
/// `GET /{key}`
///
/// Every successful lookup records a `read` event, which is what the count
/// endpoint reports.
///
/// # Errors
///
/// Returns 404 Not Found if the key doesn't exist.
pub async fn redirect_handler(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let location = state
        .redirection_service
        .get_redirection_location(&key)
        .await?;

    Ok(Redirect::temporary(&location))
}
