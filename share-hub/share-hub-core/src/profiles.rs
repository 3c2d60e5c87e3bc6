use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Profile, PublicProfile};
use crate::store::RecordStore;

/// Self-update payload. Only these fields can change through this path;
/// email and password hash are preserved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub extra: Value,
}

impl ProfileUpdate {
    fn required(field: &Option<String>, name: &str) -> Result<String> {
        // Blank input is rejected; accepted names are stored as given.
        match field.as_deref() {
            Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
            _ => Err(Error::bad_request(format!("{} is required", name))),
        }
    }

    /// Returns the validated `(first_name, last_name)` pair.
    pub fn validate(&self) -> Result<(String, String)> {
        Ok((
            Self::required(&self.first_name, "first_name")?,
            Self::required(&self.last_name, "last_name")?,
        ))
    }
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn RecordStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    async fn load(&self, caller_id: &str) -> Result<Profile> {
        self.store
            .get_profile(caller_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("profile {}", caller_id)))
    }

    pub async fn get_self(&self, caller_id: &str) -> Result<PublicProfile> {
        Ok(self.load(caller_id).await?.into())
    }

    pub async fn update_self(&self, caller_id: &str, update: ProfileUpdate) -> Result<PublicProfile> {
        let (first_name, last_name) = update.validate()?;
        let existing = self.load(caller_id).await?;
        // Read-modify-write across two store calls; concurrent updates race.
        let merged = Profile {
            first_name,
            last_name,
            extra: update.extra,
            ..existing
        };
        let saved = self.store.update_profile(caller_id, merged).await?;
        tracing::info!(profile_id = caller_id, "profile updated");
        Ok(saved.into())
    }

    /// Delete the caller's profile. Owned documents and share entries are
    /// left untouched.
    pub async fn delete_self(&self, caller_id: &str) -> Result<()> {
        self.store.delete_profile(caller_id).await?;
        tracing::info!(profile_id = caller_id, "profile deleted");
        Ok(())
    }
}
