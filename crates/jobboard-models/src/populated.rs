//! Populated ("joined") view types.
//!
//! Relationships are stored as ObjectId references. These views are what the
//! API returns after an on-demand join: the reference field is replaced by
//! the joined document, or dropped to `None` when the referenced record is
//! gone (dangling references are tolerated, not an error).

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

use crate::application::{Application, ApplicationStatus};
use crate::company::{Company, CompanyView};
use crate::job::{Job, JobType};
use crate::user::{PublicProfile, User};

/// Job with its company joined in. Applications stay as id references.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct JobWithCompany {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: f64,
    #[serde(rename = "experienceLevel")]
    pub experience_level: f64,
    pub location: String,
    #[serde(rename = "jobType")]
    pub job_type: JobType,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyView>,
    pub created_by: String,
    pub applications: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl JobWithCompany {
    pub fn assemble(job: &Job, company: Option<&Company>) -> Self {
        Self {
            id: job.id.to_hex(),
            title: job.title.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            salary: job.salary,
            experience_level: job.experience_level,
            location: job.location.clone(),
            job_type: job.job_type,
            position: job.position,
            company: company.map(CompanyView::from),
            created_by: job.created_by.to_hex(),
            applications: job.applications.iter().map(|id| id.to_hex()).collect(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Applicant projection: fullname, email and profile only. The password hash
/// and account metadata never leave the store on this path.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ApplicantPreview {
    #[serde(rename = "_id")]
    pub id: String,
    pub fullname: String,
    pub email: String,
    pub profile: PublicProfile,
}

impl ApplicantPreview {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            fullname: user.fullname.clone(),
            email: user.email.clone(),
            profile: PublicProfile::from(&user.profile),
        }
    }
}

/// Application with its applicant joined in, as embedded in a job detail.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ApplicationWithApplicant {
    #[serde(rename = "_id")]
    pub id: String,
    pub job: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantPreview>,
    pub status: ApplicationStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ApplicationWithApplicant {
    pub fn assemble(application: &Application, applicant: Option<&User>) -> Self {
        Self {
            id: application.id.to_hex(),
            job: application.job.to_hex(),
            applicant: applicant.map(ApplicantPreview::from_user),
            status: application.status,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

/// Full job detail: company joined, applications joined with applicant
/// previews.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct JobDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: f64,
    #[serde(rename = "experienceLevel")]
    pub experience_level: f64,
    pub location: String,
    #[serde(rename = "jobType")]
    pub job_type: JobType,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyView>,
    pub created_by: String,
    pub applications: Vec<ApplicationWithApplicant>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl JobDetail {
    pub fn assemble(
        job: &Job,
        company: Option<&Company>,
        applications: Vec<ApplicationWithApplicant>,
    ) -> Self {
        Self {
            id: job.id.to_hex(),
            title: job.title.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            salary: job.salary,
            experience_level: job.experience_level,
            location: job.location.clone(),
            job_type: job.job_type,
            position: job.position,
            company: company.map(CompanyView::from),
            created_by: job.created_by.to_hex(),
            applications,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Application with its job (and the job's company) joined in, for a
/// student's applied-jobs listing.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ApplicationWithJob {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobWithCompany>,
    pub applicant: String,
    pub status: ApplicationStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ApplicationWithJob {
    pub fn assemble(application: &Application, job: Option<JobWithCompany>) -> Self {
        Self {
            id: application.id.to_hex(),
            job,
            applicant: application.applicant.to_hex(),
            status: application.status,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;
    use crate::user::Role;

    fn sample_job() -> Job {
        Job::new(
            "Data Engineer",
            "Own the warehouse pipelines",
            vec!["SQL".to_string(), "Rust".to_string()],
            120000.0,
            4.0,
            "Berlin",
            JobType::Contract,
            1,
            ObjectId::new(),
            ObjectId::new(),
        )
    }

    #[test]
    fn test_job_with_company_join() {
        let job = sample_job();
        let company = Company::new("Acme", ObjectId::new());
        let view = JobWithCompany::assemble(&job, Some(&company));
        assert_eq!(view.company.as_ref().unwrap().name, "Acme");
        assert_eq!(view.id, job.id.to_hex());

        let dangling = JobWithCompany::assemble(&job, None);
        assert!(dangling.company.is_none());
    }

    #[test]
    fn test_applicant_preview_drops_password() {
        let user = User::new("Sam", "sam@example.com", 1234567890, "hash", Role::Student, "");
        let preview = ApplicantPreview::from_user(&user);
        let json = serde_json::to_value(&preview).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("phoneNumber").is_none());
        assert_eq!(json["email"], "sam@example.com");
    }
}
