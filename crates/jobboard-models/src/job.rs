//! Job posting models.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Employment type of a posting. Input is accepted case-insensitively and
/// stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Freelance => "freelance",
        }
    }

    /// Parse from user input, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full-time" => Some(JobType::FullTime),
            "part-time" => Some(JobType::PartTime),
            "contract" => Some(JobType::Contract),
            "internship" => Some(JobType::Internship),
            "freelance" => Some(JobType::Freelance),
            _ => None,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job record in the `jobs` collection.
///
/// `applications` holds back-references appended by the application
/// lifecycle; everything else is written once at posting time and only read
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub title: String,

    pub description: String,

    /// Ordered, trimmed, non-empty segments split from the delimited input.
    #[serde(default)]
    pub requirements: Vec<String>,

    pub salary: f64,

    #[serde(rename = "experienceLevel")]
    pub experience_level: f64,

    pub location: String,

    #[serde(rename = "jobType")]
    pub job_type: JobType,

    /// Number of open positions.
    pub position: u32,

    pub company: ObjectId,

    pub created_by: ObjectId,

    #[serde(default)]
    pub applications: Vec<ObjectId>,

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

impl Job {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        requirements: Vec<String>,
        salary: f64,
        experience_level: f64,
        location: impl Into<String>,
        job_type: JobType,
        position: u32,
        company: ObjectId,
        created_by: ObjectId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            title: title.into(),
            description: description.into(),
            requirements,
            salary,
            experience_level,
            location: location.into(),
            job_type,
            position,
            company,
            created_by,
            applications: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_parse_case_insensitive() {
        assert_eq!(JobType::parse("Full-Time"), Some(JobType::FullTime));
        assert_eq!(JobType::parse("INTERNSHIP"), Some(JobType::Internship));
        assert_eq!(JobType::parse("freelance"), Some(JobType::Freelance));
        assert_eq!(JobType::parse("fulltime"), None);
        assert_eq!(JobType::parse(""), None);
    }

    #[test]
    fn test_job_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(JobType::PartTime).unwrap(),
            serde_json::json!("part-time")
        );
    }

    #[test]
    fn test_new_job_has_no_applications() {
        let job = Job::new(
            "Backend Engineer",
            "Build and operate services",
            vec!["Rust".to_string()],
            90000.0,
            3.0,
            "Remote",
            JobType::FullTime,
            2,
            ObjectId::new(),
            ObjectId::new(),
        );
        assert!(job.applications.is_empty());
        assert_eq!(job.job_type.as_str(), "full-time");
    }
}
