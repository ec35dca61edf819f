//! User account and profile models.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role. Students browse and apply; recruiters own companies and jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Recruiter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Recruiter => "recruiter",
        }
    }

    /// Parse from user input. Case-sensitive, matching the accepted wire values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "recruiter" => Some(Role::Recruiter),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Embedded profile document on a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    /// URL of the uploaded resume in object storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,

    /// Filename the resume was uploaded under, for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_original_name: Option<String>,

    /// Company the user belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<ObjectId>,

    #[serde(default)]
    pub profile_photo: String,
}

/// User record in the `users` collection.
///
/// The password field holds a bcrypt hash; plaintext never persists. Email is
/// stored lowercased and is backed by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub fullname: String,

    pub email: String,

    #[serde(rename = "phoneNumber")]
    pub phone_number: u64,

    pub password: String,

    pub role: Role,

    #[serde(default)]
    pub profile: Profile,

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

impl User {
    /// Create a new user record. `password` must already be hashed.
    pub fn new(
        fullname: impl Into<String>,
        email: impl Into<String>,
        phone_number: u64,
        password_hash: impl Into<String>,
        role: Role,
        profile_photo: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            fullname: fullname.into(),
            email: email.into(),
            phone_number,
            password: password_hash.into(),
            role,
            profile: Profile {
                profile_photo: profile_photo.into(),
                ..Profile::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    /// Sanitized projection for API responses. Strips the password hash.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.to_hex(),
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number,
            role: self.role,
            profile: PublicProfile::from(&self.profile),
        }
    }
}

/// Profile as exposed over the API (references rendered as hex ids).
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub profile_photo: String,
}

impl From<&Profile> for PublicProfile {
    fn from(p: &Profile) -> Self {
        Self {
            bio: p.bio.clone(),
            skills: p.skills.clone(),
            resume: p.resume.clone(),
            resume_original_name: p.resume_original_name.clone(),
            company: p.company.map(|id| id.to_hex()),
            profile_photo: p.profile_photo.clone(),
        }
    }
}

/// User as exposed over the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PublicUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
    pub email: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: u64,
    pub role: Role,
    pub profile: PublicProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("student"), Some(Role::Student));
        assert_eq!(Role::parse("recruiter"), Some(Role::Recruiter));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Student"), None);
    }

    #[test]
    fn test_public_user_has_no_password() {
        let user = User::new("Jane Doe", "jane@example.com", 1234567890, "$2b$10$hash", Role::Student, "");
        let json = serde_json::to_value(user.public()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["fullname"], "Jane Doe");
        assert_eq!(json["phoneNumber"], 1234567890u64);
        assert_eq!(json["role"], "student");
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("Jane", "jane@example.com", 1234567890, "hash", Role::Recruiter, "http://x/p.png");
        assert!(user.profile.skills.is_empty());
        assert!(user.profile.resume.is_none());
        assert_eq!(user.profile.profile_photo, "http://x/p.png");
        assert_eq!(user.created_at, user.updated_at);
    }
}
