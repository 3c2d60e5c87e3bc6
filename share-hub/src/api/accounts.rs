use axum::{extract::State, http::StatusCode, Json};
use share_hub_core::accounts::{Credentials, Registration, TokenResponse};
use share_hub_core::model::PublicProfile;

use super::{ApiError, AppState, JsonBody};

pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<Registration>,
) -> Result<(StatusCode, Json<PublicProfile>), ApiError> {
    let profile = state.accounts.register(req).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(creds): JsonBody<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    Ok(Json(state.accounts.login(creds).await?))
}
