//! HTTP API layer exposing sharing, profile, document and account endpoints.

mod accounts;
mod documents;
mod error;
mod extract;
mod profiles;
mod shares;

pub use error::ApiError;
pub use extract::JsonBody;

use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        Method,
    },
    routing::{get, post, put},
    Router,
};
use share_hub_core::accounts::AccountService;
use share_hub_core::auth::{Hs256Verifier, TokenVerifier};
use share_hub_core::documents::DocumentService;
use share_hub_core::profiles::ProfileService;
use share_hub_core::search::ProfileSearch;
use share_hub_core::shares::ShareService;
use share_hub_core::store::RecordStore;
use share_hub_core::Error;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Verified identity of the caller, passed explicitly into every operation.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: String,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            if let Some(token) = auth.strip_prefix("Bearer ") {
                if let Some(claims) = state.verifier.verify(token).await {
                    return Ok(Self { user_id: claims.sub });
                }
                return Err(Error::unauthorized("invalid or expired token").into());
            }
        }
        if state.trust_user_header {
            if let Some(user_id) = headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .filter(|s| !s.is_empty())
            {
                return Ok(Self {
                    user_id: user_id.to_string(),
                });
            }
        }
        Err(Error::unauthorized("missing credentials").into())
    }
}

/// Shared application state. The services are stateless handles over the store.
#[derive(Clone)]
pub struct AppState {
    pub shares: ShareService,
    pub profiles: ProfileService,
    pub search: ProfileSearch,
    pub documents: DocumentService,
    pub accounts: AccountService,
    pub verifier: Arc<dyn TokenVerifier>,
    pub trust_user_header: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, tokens: Arc<Hs256Verifier>, trust_user_header: bool) -> Self {
        Self {
            shares: ShareService::new(store.clone()),
            profiles: ProfileService::new(store.clone()),
            search: ProfileSearch::new(store.clone()),
            documents: DocumentService::new(store.clone()),
            accounts: AccountService::new(store, tokens.clone()),
            verifier: tokens,
            trust_user_header,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/documents", post(documents::create_doc).get(documents::list_docs))
        .route(
            "/documents/{id}",
            get(documents::get_doc).delete(documents::delete_doc),
        )
        .route(
            "/documents/{id}/shares",
            get(shares::get_shares).put(shares::set_shares),
        )
        .route(
            "/documents/{id}/shares/{profile_id}",
            put(shares::add_share).delete(shares::remove_share),
        )
        .route(
            "/profiles/me",
            get(profiles::get_me)
                .put(profiles::update_me)
                .delete(profiles::delete_me),
        )
        .route("/profiles", get(profiles::search))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
