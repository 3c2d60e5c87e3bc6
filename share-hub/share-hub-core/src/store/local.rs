use super::{RecordStore, StoreResult};
use crate::error::StoreError;
use crate::model::{Document, Profile, ShareRecord};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const RECORDS_FILE: &str = "records.json";

#[derive(Clone, Default, Serialize, Deserialize)]
struct Tables {
    profiles: HashMap<String, Profile>,
    documents: HashMap<String, Document>,
    shares: HashMap<String, ShareRecord>,
}

/// Result of applying a change to a candidate copy of the tables.
enum Outcome<T> {
    /// Nothing changed; skip the write.
    Unchanged(T),
    Changed(T),
}

/// Record store kept in memory, optionally mirrored to `records.json` in a
/// data directory.
///
/// Mutations are applied to a copy of the tables, persisted, and only then
/// published, so a failed write leaves the visible state untouched. Writers
/// are serialized by `writer`; readers only ever take the `tables` lock for
/// the length of a lookup.
pub struct LocalStore {
    tables: RwLock<Tables>,
    writer: Mutex<()>,
    path: Option<PathBuf>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            writer: Mutex::new(()),
            path: None,
        }
    }

    /// Open (or create) a store persisted under `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(RECORDS_FILE);
        let tables = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Tables::default()
        };
        tracing::debug!(
            path = %path.display(),
            profiles = tables.profiles.len(),
            documents = tables.documents.len(),
            "opened record store"
        );
        Ok(Self {
            tables: RwLock::new(tables),
            writer: Mutex::new(()),
            path: Some(path),
        })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn commit<T, F>(&self, change: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Tables) -> StoreResult<Outcome<T>>,
    {
        let _writer = self.writer.lock().await;
        let mut next = self.tables.read().clone();
        let value = match change(&mut next)? {
            Outcome::Unchanged(value) => return Ok(value),
            Outcome::Changed(value) => value,
        };
        if let Some(path) = &self.path {
            let data = serde_json::to_vec(&next)?;
            let path = path.clone();
            tokio::task::spawn_blocking(move || write_atomically(&path, &data))
                .await
                .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;
        }
        *self.tables.write() = next;
        Ok(value)
    }

    fn email_taken(tables: &Tables, email: &str, except_id: Option<&str>) -> bool {
        tables.profiles.values().any(|p| {
            p.email.eq_ignore_ascii_case(email) && Some(p.id.as_str()) != except_id
        })
    }
}

fn write_atomically(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)
}

#[async_trait]
impl RecordStore for LocalStore {
    async fn get_document(&self, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.tables.read().documents.get(id).cloned())
    }

    async fn put_document(&self, doc: Document) -> StoreResult<()> {
        self.commit(|tables| {
            tables.documents.insert(doc.id.clone(), doc);
            Ok(Outcome::Changed(()))
        })
        .await
    }

    async fn delete_document(&self, id: &str) -> StoreResult<()> {
        self.commit(|tables| {
            if tables.documents.remove(id).is_none() {
                return Err(StoreError::NotFound(format!("document {}", id)));
            }
            tables.shares.remove(id);
            Ok(Outcome::Changed(()))
        })
        .await
    }

    async fn documents_owned_by(&self, owner_id: &str) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read();
        let mut docs: Vec<Document> = tables
            .documents
            .values()
            .filter(|d| d.owner_id == owner_id)
            .cloned()
            .collect();
        docs.sort_by(|a, b| a.creation_date.cmp(&b.creation_date).then(a.id.cmp(&b.id)));
        Ok(docs)
    }

    async fn documents_shared_with(&self, profile_id: &str) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read();
        let mut docs: Vec<Document> = tables
            .shares
            .values()
            .filter(|r| r.contains(profile_id))
            .filter_map(|r| tables.documents.get(&r.document_id).cloned())
            .collect();
        docs.sort_by(|a, b| a.creation_date.cmp(&b.creation_date).then(a.id.cmp(&b.id)));
        Ok(docs)
    }

    async fn get_share_record(&self, document_id: &str) -> StoreResult<Option<ShareRecord>> {
        Ok(self.tables.read().shares.get(document_id).cloned())
    }

    async fn set_share_record(
        &self,
        document_id: &str,
        shared_with: Vec<String>,
    ) -> StoreResult<()> {
        self.commit(|tables| {
            tables.shares.insert(
                document_id.to_string(),
                ShareRecord {
                    document_id: document_id.to_string(),
                    shared_with,
                },
            );
            Ok(Outcome::Changed(()))
        })
        .await
    }

    async fn add_sharer(&self, document_id: &str, profile_id: &str) -> StoreResult<()> {
        self.commit(|tables| {
            let record = tables
                .shares
                .entry(document_id.to_string())
                .or_insert_with(|| ShareRecord::new(document_id));
            if record.contains(profile_id) {
                return Ok(Outcome::Unchanged(()));
            }
            record.shared_with.push(profile_id.to_string());
            Ok(Outcome::Changed(()))
        })
        .await
    }

    async fn remove_sharer(&self, document_id: &str, profile_id: &str) -> StoreResult<()> {
        self.commit(|tables| {
            let Some(record) = tables.shares.get_mut(document_id) else {
                return Ok(Outcome::Unchanged(()));
            };
            let before = record.shared_with.len();
            record.shared_with.retain(|p| p != profile_id);
            if record.shared_with.len() == before {
                return Ok(Outcome::Unchanged(()));
            }
            Ok(Outcome::Changed(()))
        })
        .await
    }

    async fn get_profile(&self, id: &str) -> StoreResult<Option<Profile>> {
        Ok(self.tables.read().profiles.get(id).cloned())
    }

    async fn get_profile_by_email(&self, email: &str) -> StoreResult<Option<Profile>> {
        Ok(self
            .tables
            .read()
            .profiles
            .values()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn all_profiles(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.tables.read().profiles.values().cloned().collect())
    }

    async fn insert_profile(&self, profile: Profile) -> StoreResult<()> {
        self.commit(|tables| {
            if tables.profiles.contains_key(&profile.id) {
                return Err(StoreError::Conflict(format!("profile {}", profile.id)));
            }
            if Self::email_taken(tables, &profile.email, None) {
                return Err(StoreError::Conflict(format!("email {}", profile.email)));
            }
            tables.profiles.insert(profile.id.clone(), profile);
            Ok(Outcome::Changed(()))
        })
        .await
    }

    async fn update_profile(&self, id: &str, mut profile: Profile) -> StoreResult<Profile> {
        self.commit(|tables| {
            if !tables.profiles.contains_key(id) {
                return Err(StoreError::NotFound(format!("profile {}", id)));
            }
            if Self::email_taken(tables, &profile.email, Some(id)) {
                return Err(StoreError::Conflict(format!("email {}", profile.email)));
            }
            profile.id = id.to_string();
            profile.last_modified_date = Utc::now();
            tables.profiles.insert(id.to_string(), profile.clone());
            Ok(Outcome::Changed(profile))
        })
        .await
    }

    async fn delete_profile(&self, id: &str) -> StoreResult<()> {
        self.commit(|tables| {
            if tables.profiles.remove(id).is_none() {
                return Err(StoreError::NotFound(format!("profile {}", id)));
            }
            Ok(Outcome::Changed(()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn profile(id: &str, email: &str) -> Profile {
        let now = Utc::now();
        Profile {
            id: id.into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            email: email.into(),
            password_hash: "hash".into(),
            creation_date: now,
            last_modified_date: now,
            extra: Value::Null,
        }
    }

    fn document(id: &str, owner: &str) -> Document {
        let now = Utc::now();
        Document {
            id: id.into(),
            owner_id: owner.into(),
            title: "notes".into(),
            content: String::new(),
            creation_date: now,
            last_modified_date: now,
        }
    }

    #[tokio::test]
    async fn sharer_ops_are_idempotent() {
        let store = LocalStore::in_memory();
        store.add_sharer("d1", "p2").await.unwrap();
        store.add_sharer("d1", "p2").await.unwrap();
        store.remove_sharer("d1", "p9").await.unwrap();
        store.remove_sharer("missing", "p9").await.unwrap();
        let record = store.get_share_record("d1").await.unwrap().unwrap();
        assert_eq!(record.shared_with, vec!["p2".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = LocalStore::in_memory();
        store.insert_profile(profile("p1", "a@x.com")).await.unwrap();
        let err = store
            .insert_profile(profile("p2", "A@X.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn missing_profile_delete_is_not_found() {
        let store = LocalStore::in_memory();
        let err = store.delete_profile("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn deleting_document_drops_share_record() {
        let store = LocalStore::in_memory();
        store.put_document(document("d1", "p1")).await.unwrap();
        store.set_share_record("d1", vec!["p2".into()]).await.unwrap();
        store.delete_document("d1").await.unwrap();
        assert!(store.get_share_record("d1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reopened_store_keeps_records() {
        let tempdir = tempfile::tempdir().unwrap();
        {
            let store = LocalStore::open(tempdir.path()).unwrap();
            store.insert_profile(profile("p1", "a@x.com")).await.unwrap();
            store.put_document(document("d1", "p1")).await.unwrap();
            store.add_sharer("d1", "p2").await.unwrap();
        }
        let store = LocalStore::open(tempdir.path()).unwrap();
        assert!(store.get_profile("p1").await.unwrap().is_some());
        assert_eq!(
            store.documents_shared_with("p2").await.unwrap()[0].id,
            "d1"
        );
    }

    #[tokio::test]
    async fn failed_write_leaves_state_unchanged() {
        let tempdir = tempfile::tempdir().unwrap();
        let dir = tempdir.path().join("data");
        let store = LocalStore::open(&dir).unwrap();
        store.put_document(document("d1", "p1")).await.unwrap();
        store.insert_profile(profile("p1", "a@x.com")).await.unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            store.add_sharer("d1", "p2").await.unwrap_err(),
            StoreError::Io(_)
        ));
        assert!(store.get_share_record("d1").await.unwrap().is_none());

        assert!(store.delete_profile("p1").await.is_err());
        assert!(store.get_profile("p1").await.unwrap().is_some());

        let mut renamed = profile("p1", "a@x.com");
        renamed.first_name = "Renamed".into();
        assert!(store.update_profile("p1", renamed).await.is_err());
        assert_eq!(store.get_profile("p1").await.unwrap().unwrap().first_name, "First");

        // no-op changes never touch the disk
        store.remove_sharer("d1", "p2").await.unwrap();
    }
}
