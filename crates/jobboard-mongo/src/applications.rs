//! Application repository.

use std::collections::HashMap;

use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime};
use mongodb::Collection;
use tracing::info;

use jobboard_models::{
    Application, ApplicationStatus, ApplicationWithJob, Job, JobWithCompany,
};

use crate::client::{collections, MongoClient};
use crate::companies::CompanyRepo;
use crate::error::DbResult;

/// Repository for application documents.
#[derive(Clone)]
pub struct ApplicationRepo {
    applications: Collection<Application>,
    jobs: Collection<Job>,
    companies: CompanyRepo,
}

impl ApplicationRepo {
    pub fn new(store: &MongoClient) -> Self {
        Self {
            applications: store.collection(collections::APPLICATIONS),
            jobs: store.collection(collections::JOBS),
            companies: CompanyRepo::new(store),
        }
    }

    /// The caller's existing application for a job, if any. Fast-path check;
    /// the unique (job, applicant) index is the real guard.
    pub async fn find_for(
        &self,
        job: &ObjectId,
        applicant: &ObjectId,
    ) -> DbResult<Option<Application>> {
        Ok(self
            .applications
            .find_one(doc! { "job": *job, "applicant": *applicant })
            .await?)
    }

    /// Lookup by id string. Malformed ids resolve to `None`.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Application>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.applications.find_one(doc! { "_id": oid }).await?)
    }

    /// Insert a new application. A raced duplicate (job, applicant) pair
    /// surfaces as a duplicate-key error from the compound index.
    pub async fn insert(&self, application: &Application) -> DbResult<()> {
        self.applications.insert_one(application).await?;
        info!(
            application_id = %application.id,
            job_id = %application.job,
            "Created application"
        );
        Ok(())
    }

    /// The caller's applications, newest first, each with its job and the
    /// job's company joined.
    pub async fn find_by_applicant_with_jobs(
        &self,
        applicant: &ObjectId,
    ) -> DbResult<Vec<ApplicationWithJob>> {
        let applications: Vec<Application> = self
            .applications
            .find(doc! { "applicant": *applicant })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;

        let job_ids: Vec<ObjectId> = applications.iter().map(|a| a.job).collect();
        let jobs: HashMap<ObjectId, Job> = if job_ids.is_empty() {
            HashMap::new()
        } else {
            let found: Vec<Job> = self
                .jobs
                .find(doc! { "_id": { "$in": job_ids } })
                .await?
                .try_collect()
                .await?;
            found.into_iter().map(|j| (j.id, j)).collect()
        };

        let company_ids: Vec<ObjectId> = jobs.values().map(|j| j.company).collect();
        let companies = self.companies.find_by_ids(&company_ids).await?;

        Ok(applications
            .iter()
            .map(|app| {
                let job = jobs
                    .get(&app.job)
                    .map(|j| JobWithCompany::assemble(j, companies.get(&j.company)));
                ApplicationWithJob::assemble(app, job)
            })
            .collect())
    }

    /// Update an application's status.
    pub async fn set_status(&self, id: &ObjectId, status: ApplicationStatus) -> DbResult<()> {
        self.applications
            .update_one(
                doc! { "_id": *id },
                doc! {
                    "$set": { "status": status.as_str(), "updatedAt": DateTime::now() },
                },
            )
            .await?;
        Ok(())
    }
}
