use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, AuthContext, JsonBody};

#[derive(Serialize, Deserialize)]
pub struct SharesBody {
    pub shared_with: Vec<String>,
}

pub async fn get_shares(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<SharesBody>, ApiError> {
    let shared_with = state.shares.get_sharers(&auth.user_id, &id).await?;
    Ok(Json(SharesBody { shared_with }))
}

pub async fn set_shares(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<SharesBody>,
) -> Result<StatusCode, ApiError> {
    state
        .shares
        .set_sharers(&auth.user_id, &id, &req.shared_with)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_share(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, profile_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .shares
        .add_sharer(&auth.user_id, &id, &profile_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_share(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, profile_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .shares
        .remove_sharer(&auth.user_id, &id, &profile_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
