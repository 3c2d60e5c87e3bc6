use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile record as persisted in the store.
///
/// `password_hash` is stored but never leaves the service; use
/// [`Profile::to_public`] for anything sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    #[serde(default)]
    pub extra: Value,
}

/// Outward view of a [`Profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub extra: Value,
}

impl Profile {
    pub fn to_public(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            creation_date: self.creation_date,
            last_modified_date: self.last_modified_date,
            extra: self.extra.clone(),
        }
    }
}

impl From<Profile> for PublicProfile {
    fn from(profile: Profile) -> Self {
        PublicProfile {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            creation_date: profile.creation_date,
            last_modified_date: profile.last_modified_date,
            extra: profile.extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
}

/// Per-document set of profile IDs the document is shared with.
///
/// The list has set semantics: no duplicates and never the owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    pub document_id: String,
    pub shared_with: Vec<String>,
}

impl ShareRecord {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            shared_with: Vec::new(),
        }
    }

    pub fn contains(&self, profile_id: &str) -> bool {
        self.shared_with.iter().any(|p| p == profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn public_profile_never_carries_password_hash() {
        let now = Utc::now();
        let profile = Profile {
            id: "p1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@x.com".into(),
            password_hash: "$argon2id$secret".into(),
            creation_date: now,
            last_modified_date: now,
            extra: json!({"theme": "dark"}),
        };
        let v = serde_json::to_value(profile.to_public()).unwrap();
        assert!(v.get("password_hash").is_none());
        assert_eq!(v["extra"]["theme"], "dark");
        assert_eq!(v["email"], "ada@x.com");
    }
}
