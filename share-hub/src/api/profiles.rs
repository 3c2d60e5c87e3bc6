use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use share_hub_core::model::PublicProfile;
use share_hub_core::profiles::ProfileUpdate;
use share_hub_core::search::{ProfileQuery, SearchPage};

use super::{ApiError, AppState, AuthContext, JsonBody};

pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<PublicProfile>, ApiError> {
    Ok(Json(state.profiles.get_self(&auth.user_id).await?))
}

pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthContext,
    JsonBody(req): JsonBody<ProfileUpdate>,
) -> Result<Json<PublicProfile>, ApiError> {
    Ok(Json(state.profiles.update_self(&auth.user_id, req).await?))
}

pub async fn delete_me(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<StatusCode, ApiError> {
    state.profiles.delete_self(&auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn search(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(params): Query<ProfileQuery>,
) -> Result<Json<SearchPage>, ApiError> {
    Ok(Json(state.search.search(&params).await?))
}
