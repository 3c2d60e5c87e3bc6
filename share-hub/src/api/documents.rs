use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use share_hub_core::documents::{DocumentListing, NewDocument};
use share_hub_core::model::Document;

use super::{ApiError, AppState, AuthContext, JsonBody};

pub async fn create_doc(
    State(state): State<AppState>,
    auth: AuthContext,
    JsonBody(req): JsonBody<NewDocument>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let doc = state.documents.create(&auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

pub async fn list_docs(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<DocumentListing>, ApiError> {
    Ok(Json(state.documents.list(&auth.user_id).await?))
}

pub async fn get_doc(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.documents.get(&auth.user_id, &id).await?))
}

pub async fn delete_doc(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.documents.delete(&auth.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
