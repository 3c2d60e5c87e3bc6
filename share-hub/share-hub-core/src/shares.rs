//! Share list management for documents.
//!
//! Only the owner may read or change a document's share list. Every call goes
//! through [`check_owner`] first and re-reads the store; nothing is cached.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::guard::check_owner;
use crate::store::RecordStore;

/// Trim every ID, drop the empty ones and dedupe (first occurrence wins).
///
/// Fails with [`Error::BadRequest`] if the owner appears in the result.
pub fn normalize_share_list(raw: &[String], owner_id: &str) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for id in raw {
        let id = id.trim();
        if id.is_empty() {
            continue;
        }
        if id == owner_id {
            return Err(Error::bad_request("cannot share a document with its owner"));
        }
        if !out.iter().any(|existing| existing == id) {
            out.push(id.to_string());
        }
    }
    Ok(out)
}

#[derive(Clone)]
pub struct ShareService {
    store: Arc<dyn RecordStore>,
}

impl ShareService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn get_sharers(&self, caller_id: &str, document_id: &str) -> Result<Vec<String>> {
        // Unlike the mutating operations, an empty ID here is a bad request.
        if document_id.is_empty() {
            return Err(Error::bad_request("document id is required"));
        }
        check_owner(self.store.as_ref(), caller_id, document_id).await?;
        let sharers = self
            .store
            .get_share_record(document_id)
            .await?
            .map(|r| r.shared_with)
            .unwrap_or_default();
        tracing::debug!(document_id, count = sharers.len(), "loaded share list");
        Ok(sharers)
    }

    pub async fn set_sharers(
        &self,
        caller_id: &str,
        document_id: &str,
        proposed: &[String],
    ) -> Result<()> {
        if document_id.is_empty() {
            return Err(Error::not_found("document"));
        }
        let owner_id = check_owner(self.store.as_ref(), caller_id, document_id).await?;
        let normalized = normalize_share_list(proposed, &owner_id)?;
        tracing::info!(document_id, count = normalized.len(), "replacing share list");
        self.store.set_share_record(document_id, normalized).await?;
        Ok(())
    }

    pub async fn add_sharer(
        &self,
        caller_id: &str,
        document_id: &str,
        profile_id: &str,
    ) -> Result<()> {
        if document_id.is_empty() {
            return Err(Error::not_found("document"));
        }
        if profile_id.is_empty() {
            return Err(Error::not_found("profile"));
        }
        let owner_id = check_owner(self.store.as_ref(), caller_id, document_id).await?;
        if profile_id == owner_id {
            return Err(Error::bad_request("cannot share a document with its owner"));
        }
        // No existence check on profile_id: sharing with an unknown profile is allowed.
        self.store.add_sharer(document_id, profile_id).await?;
        tracing::info!(document_id, profile_id, "shared document");
        Ok(())
    }

    pub async fn remove_sharer(
        &self,
        caller_id: &str,
        document_id: &str,
        profile_id: &str,
    ) -> Result<()> {
        if document_id.is_empty() {
            return Err(Error::not_found("document"));
        }
        if profile_id.is_empty() {
            return Err(Error::not_found("profile"));
        }
        check_owner(self.store.as_ref(), caller_id, document_id).await?;
        self.store.remove_sharer(document_id, profile_id).await?;
        tracing::info!(document_id, profile_id, "unshared document");
        Ok(())
    }
}
