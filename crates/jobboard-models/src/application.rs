//! Job application models.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application status. New applications start pending; only the job's
/// creator moves them on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse from user input, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application record in the `applications` collection.
///
/// (job, applicant) carries a unique compound index: one application per
/// student per job. A raced duplicate insert fails at the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub job: ObjectId,

    pub applicant: ObjectId,

    #[serde(default)]
    pub status: ApplicationStatus,

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

impl Application {
    pub fn new(job: ObjectId, applicant: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            job,
            applicant,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(ApplicationStatus::parse("Accepted"), Some(ApplicationStatus::Accepted));
        assert_eq!(ApplicationStatus::parse("REJECTED"), Some(ApplicationStatus::Rejected));
        assert_eq!(ApplicationStatus::parse("withdrawn"), None);
    }

    #[test]
    fn test_new_application_is_pending() {
        let app = Application::new(ObjectId::new(), ObjectId::new());
        assert_eq!(app.status, ApplicationStatus::Pending);
    }
}
