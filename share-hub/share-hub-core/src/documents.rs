use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::guard::check_owner;
use crate::model::Document;
use crate::store::RecordStore;

#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentListing {
    pub owned: Vec<Document>,
    pub shared: Vec<Document>,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn RecordStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller_id: &str, req: NewDocument) -> Result<Document> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(Error::bad_request("title is required"));
        }
        // Owners must exist when the document is created; later profile
        // deletion does not touch the document.
        if self.store.get_profile(caller_id).await?.is_none() {
            return Err(Error::not_found(format!("profile {}", caller_id)));
        }
        let now = Utc::now();
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            owner_id: caller_id.to_string(),
            title: title.to_string(),
            content: req.content,
            creation_date: now,
            last_modified_date: now,
        };
        self.store.put_document(doc.clone()).await?;
        tracing::info!(document_id = %doc.id, owner_id = caller_id, "created document");
        Ok(doc)
    }

    /// Readable by the owner and by anyone on the share list.
    pub async fn get(&self, caller_id: &str, document_id: &str) -> Result<Document> {
        let doc = self
            .store
            .get_document(document_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("document {}", document_id)))?;
        if doc.owner_id == caller_id {
            return Ok(doc);
        }
        let shared = self
            .store
            .get_share_record(document_id)
            .await?
            .is_some_and(|r| r.contains(caller_id));
        if !shared {
            tracing::warn!(document_id, caller_id, "read denied");
            return Err(Error::forbidden(format!("document {} is not shared with caller", document_id)));
        }
        Ok(doc)
    }

    pub async fn list(&self, caller_id: &str) -> Result<DocumentListing> {
        Ok(DocumentListing {
            owned: self.store.documents_owned_by(caller_id).await?,
            shared: self.store.documents_shared_with(caller_id).await?,
        })
    }

    pub async fn delete(&self, caller_id: &str, document_id: &str) -> Result<()> {
        check_owner(self.store.as_ref(), caller_id, document_id).await?;
        self.store.delete_document(document_id).await?;
        tracing::info!(document_id, "deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;
    use crate::store::LocalStore;
    use serde_json::Value;

    async fn store_with(ids: &[&str]) -> Arc<LocalStore> {
        let store = Arc::new(LocalStore::in_memory());
        let now = Utc::now();
        for id in ids {
            store
                .insert_profile(Profile {
                    id: id.to_string(),
                    first_name: "F".into(),
                    last_name: "L".into(),
                    email: format!("{}@x.com", id),
                    password_hash: "h".into(),
                    creation_date: now,
                    last_modified_date: now,
                    extra: Value::Null,
                })
                .await
                .unwrap();
        }
        store
    }

    fn new_doc(title: &str) -> NewDocument {
        NewDocument {
            title: title.into(),
            content: "body".into(),
        }
    }

    #[tokio::test]
    async fn sharer_can_read_stranger_cannot() {
        let store = store_with(&["user_A"]).await;
        let svc = DocumentService::new(store.clone());
        let doc = svc.create("user_A", new_doc("plan")).await.unwrap();
        store.add_sharer(&doc.id, "user_B").await.unwrap();

        assert_eq!(svc.get("user_B", &doc.id).await.unwrap().title, "plan");
        assert!(matches!(svc.get("user_C", &doc.id).await.unwrap_err(), Error::Forbidden(_)));

        let listing = svc.list("user_B").await.unwrap();
        assert!(listing.owned.is_empty());
        assert_eq!(listing.shared.len(), 1);
    }

    #[tokio::test]
    async fn only_owner_deletes() {
        let svc = DocumentService::new(store_with(&["user_A"]).await);
        let doc = svc.create("user_A", new_doc("plan")).await.unwrap();
        assert!(matches!(svc.delete("user_B", &doc.id).await.unwrap_err(), Error::Forbidden(_)));
        svc.delete("user_A", &doc.id).await.unwrap();
        assert!(matches!(svc.get("user_A", &doc.id).await.unwrap_err(), Error::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let svc = DocumentService::new(store_with(&["user_A"]).await);
        assert!(matches!(svc.create("user_A", new_doc("  ")).await.unwrap_err(), Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn owner_must_have_a_profile() {
        let store = store_with(&["user_A"]).await;
        let svc = DocumentService::new(store.clone());
        let err = svc.create("ghost", new_doc("plan")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(store.documents_owned_by("ghost").await.unwrap().is_empty());

        // deleting the owner afterwards leaves the document in place
        let doc = svc.create("user_A", new_doc("plan")).await.unwrap();
        store.delete_profile("user_A").await.unwrap();
        assert_eq!(svc.get("user_A", &doc.id).await.unwrap().id, doc.id);
        assert!(matches!(
            svc.create("user_A", new_doc("again")).await.unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
