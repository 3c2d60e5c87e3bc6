use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use share_hub_core::Error;

use super::ApiError;

/// `Json<T>` whose rejections render as a 400 with the usual error body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let message = match &rejection {
                    JsonRejection::JsonDataError(err) => format!("invalid JSON data: {}", err.body_text()),
                    JsonRejection::JsonSyntaxError(_) => "malformed JSON".to_string(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "expected Content-Type: application/json".to_string()
                    }
                    JsonRejection::BytesRejection(_) => "failed to read request body".to_string(),
                    _ => "invalid JSON request".to_string(),
                };
                tracing::debug!(%rejection, "rejected request body");
                Err(Error::bad_request(message).into())
            }
        }
    }
}
