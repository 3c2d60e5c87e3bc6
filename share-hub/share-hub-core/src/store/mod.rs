//! Record store seam.
//!
//! Managers only talk to storage through [`RecordStore`]. Every method is a
//! single atomic step against one entity; anything that needs two calls is a
//! read-modify-write and is not protected against interleaving.

mod local;

pub use local::LocalStore;

use crate::error::StoreError;
use crate::model::{Document, Profile, ShareRecord};
use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_document(&self, id: &str) -> StoreResult<Option<Document>>;
    async fn put_document(&self, doc: Document) -> StoreResult<()>;
    /// Delete a document together with its share record.
    async fn delete_document(&self, id: &str) -> StoreResult<()>;
    async fn documents_owned_by(&self, owner_id: &str) -> StoreResult<Vec<Document>>;
    /// Documents whose share record lists `profile_id`.
    async fn documents_shared_with(&self, profile_id: &str) -> StoreResult<Vec<Document>>;

    async fn get_share_record(&self, document_id: &str) -> StoreResult<Option<ShareRecord>>;
    /// Create or overwrite the share record with exactly `shared_with`.
    async fn set_share_record(&self, document_id: &str, shared_with: Vec<String>)
        -> StoreResult<()>;
    /// Insert one ID; a no-op when already present.
    async fn add_sharer(&self, document_id: &str, profile_id: &str) -> StoreResult<()>;
    /// Remove one ID; a no-op when absent.
    async fn remove_sharer(&self, document_id: &str, profile_id: &str) -> StoreResult<()>;

    async fn get_profile(&self, id: &str) -> StoreResult<Option<Profile>>;
    /// Case-insensitive lookup.
    async fn get_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>>;
    async fn all_profiles(&self) -> StoreResult<Vec<Profile>>;
    /// Fails with [`StoreError::Conflict`] on a duplicate id or email.
    async fn insert_profile(&self, profile: Profile) -> StoreResult<()>;
    /// Replace the record and stamp `last_modified_date` with the current time.
    async fn update_profile(&self, id: &str, profile: Profile) -> StoreResult<Profile>;
    async fn delete_profile(&self, id: &str) -> StoreResult<()>;
}
