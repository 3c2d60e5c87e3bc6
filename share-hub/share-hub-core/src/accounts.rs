//! Registration and password login.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Hs256Verifier;
use crate::error::{Error, Result};
use crate::model::{Profile, PublicProfile};
use crate::store::RecordStore;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub extra: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub profile_id: String,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn RecordStore>,
    tokens: Arc<Hs256Verifier>,
}

impl AccountService {
    pub fn new(store: Arc<dyn RecordStore>, tokens: Arc<Hs256Verifier>) -> Self {
        Self { store, tokens }
    }

    pub async fn register(&self, req: Registration) -> Result<PublicProfile> {
        let email = req.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::bad_request("a valid email is required"));
        }
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(Error::bad_request(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let first_name = req.first_name.trim();
        let last_name = req.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(Error::bad_request("first_name and last_name are required"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| Error::internal(format!("password hashing failed: {}", e)))?
            .to_string();

        let now = Utc::now();
        let profile = Profile {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash,
            creation_date: now,
            last_modified_date: now,
            extra: req.extra,
        };
        self.store.insert_profile(profile.clone()).await?;
        tracing::info!(profile_id = %profile.id, "registered profile");
        Ok(profile.into())
    }

    pub async fn login(&self, creds: Credentials) -> Result<TokenResponse> {
        let invalid = || Error::unauthorized("invalid email or password");
        let profile = self
            .store
            .get_profile_by_email(creds.email.trim())
            .await?
            .ok_or_else(invalid)?;
        let parsed = PasswordHash::new(&profile.password_hash)
            .map_err(|e| Error::internal(format!("stored hash unreadable: {}", e)))?;
        Argon2::default()
            .verify_password(creds.password.as_bytes(), &parsed)
            .map_err(|_| invalid())?;

        let access_token = self.tokens.issue(&profile.id)?;
        tracing::info!(profile_id = %profile.id, "login succeeded");
        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl().as_secs(),
            profile_id: profile.id,
        })
    }
}
