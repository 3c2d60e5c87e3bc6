use crate::error::{Error, Result};
use crate::store::RecordStore;

/// Confirm that `document_id` exists and is owned by `caller_id`.
///
/// Returns the owner ID so callers can reuse it without another lookup.
pub async fn check_owner(
    store: &dyn RecordStore,
    caller_id: &str,
    document_id: &str,
) -> Result<String> {
    let doc = store
        .get_document(document_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("document {}", document_id)))?;
    if doc.owner_id != caller_id {
        tracing::warn!(document_id, caller_id, "caller does not own document");
        return Err(Error::forbidden(format!(
            "document {} is not owned by caller",
            document_id
        )));
    }
    Ok(doc.owner_id)
}
