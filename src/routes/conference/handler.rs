use axum::{extract::State, response::Response};

use super::model::Conference;
use crate::{AppState, error::AppError, routes::records_response};

#[axum::debug_handler]
pub async fn list_conferences(State(state): State<AppState>) -> Result<Response, AppError> {
    let fetched = state
        .gateway
        .fetch::<Conference>(&state.config.conferences)
        .await?;
    Ok(records_response(fetched))
}
