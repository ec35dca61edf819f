//! Company models.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Company record in the `companies` collection.
///
/// Name is trimmed and backed by a unique index; the application-level
/// existence check is only the fast path for a friendly error. Ownership
/// (`user_id`) is set at creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// URL of the uploaded logo in object storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Owning user.
    #[serde(rename = "userId")]
    pub user_id: ObjectId,

    #[serde(
        rename = "createdAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,

    #[serde(
        rename = "updatedAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company owned by `user_id`. `name` must already be
    /// trimmed and validated.
    pub fn new(name: impl Into<String>, user_id: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: name.into(),
            description: None,
            website: None,
            location: None,
            logo: None,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Company as exposed over the API.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CompanyView {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Company> for CompanyView {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id.to_hex(),
            name: c.name.clone(),
            description: c.description.clone(),
            website: c.website.clone(),
            location: c.location.clone(),
            logo: c.logo.clone(),
            user_id: c.user_id.to_hex(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_view_renders_hex_ids() {
        let owner = ObjectId::new();
        let company = Company::new("Acme", owner);
        let view = CompanyView::from(&company);
        assert_eq!(view.user_id, owner.to_hex());
        assert_eq!(view.id.len(), 24);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["userId"], owner.to_hex());
        // Optional fields absent until set
        assert!(json.get("website").is_none());
    }
}
