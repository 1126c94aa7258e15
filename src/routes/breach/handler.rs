use axum::{extract::State, response::Response};

use super::model::Breach;
use crate::{AppState, error::AppError, routes::records_response};

#[axum::debug_handler]
pub async fn list_breaches(State(state): State<AppState>) -> Result<Response, AppError> {
    let fetched = state.gateway.fetch::<Breach>(&state.config.breaches).await?;
    Ok(records_response(fetched))
}
