//! Job repository, including the populated read paths.

use std::collections::HashMap;

use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime};
use mongodb::Collection;
use tracing::info;

use jobboard_models::{
    Application, ApplicationWithApplicant, Job, JobDetail, JobWithCompany, User,
};

use crate::client::{collections, MongoClient};
use crate::companies::CompanyRepo;
use crate::error::DbResult;

/// Repository for job documents. Carries handles to the referenced
/// collections so read paths can join on demand.
#[derive(Clone)]
pub struct JobRepo {
    jobs: Collection<Job>,
    companies: CompanyRepo,
    applications: Collection<Application>,
    users: Collection<User>,
}

impl JobRepo {
    pub fn new(store: &MongoClient) -> Self {
        Self {
            jobs: store.collection(collections::JOBS),
            companies: CompanyRepo::new(store),
            applications: store.collection(collections::APPLICATIONS),
            users: store.collection(collections::USERS),
        }
    }

    pub async fn insert(&self, job: &Job) -> DbResult<()> {
        self.jobs.insert_one(job).await?;
        info!(job_id = %job.id, title = %job.title, "Posted job");
        Ok(())
    }

    /// Lookup by id string. Malformed ids resolve to `None`.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Job>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.jobs.find_one(doc! { "_id": oid }).await?)
    }

    /// Case-insensitive substring search over title and description, newest
    /// first, companies joined. An empty keyword matches everything. The
    /// result set is unbounded.
    pub async fn search_with_company(&self, keyword: &str) -> DbResult<Vec<JobWithCompany>> {
        let filter = doc! {
            "$or": [
                { "title": { "$regex": keyword, "$options": "i" } },
                { "description": { "$regex": keyword, "$options": "i" } },
            ]
        };
        let jobs: Vec<Job> = self
            .jobs
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        self.join_companies(jobs).await
    }

    /// Jobs created by `creator`, newest first, companies joined.
    pub async fn find_by_creator_with_company(
        &self,
        creator: &ObjectId,
    ) -> DbResult<Vec<JobWithCompany>> {
        let jobs: Vec<Job> = self
            .jobs
            .find(doc! { "created_by": *creator })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;
        self.join_companies(jobs).await
    }

    async fn join_companies(&self, jobs: Vec<Job>) -> DbResult<Vec<JobWithCompany>> {
        let company_ids: Vec<ObjectId> = jobs.iter().map(|j| j.company).collect();
        let companies = self.companies.find_by_ids(&company_ids).await?;
        Ok(jobs
            .iter()
            .map(|job| JobWithCompany::assemble(job, companies.get(&job.company)))
            .collect())
    }

    /// Full job detail: company joined, applications joined with applicant
    /// previews, in the order the back-references were appended.
    pub async fn detail(&self, id: &str) -> DbResult<Option<JobDetail>> {
        let Some(job) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let companies = self.companies.find_by_ids(&[job.company]).await?;

        let applications: Vec<Application> = if job.applications.is_empty() {
            Vec::new()
        } else {
            self.applications
                .find(doc! { "_id": { "$in": job.applications.clone() } })
                .await?
                .try_collect()
                .await?
        };

        let applicant_ids: Vec<ObjectId> = applications.iter().map(|a| a.applicant).collect();
        let applicants: HashMap<ObjectId, User> = if applicant_ids.is_empty() {
            HashMap::new()
        } else {
            let users: Vec<User> = self
                .users
                .find(doc! { "_id": { "$in": applicant_ids } })
                .await?
                .try_collect()
                .await?;
            users.into_iter().map(|u| (u.id, u)).collect()
        };

        let by_id: HashMap<ObjectId, Application> =
            applications.into_iter().map(|a| (a.id, a)).collect();
        let populated = job
            .applications
            .iter()
            .filter_map(|app_id| by_id.get(app_id))
            .map(|app| ApplicationWithApplicant::assemble(app, applicants.get(&app.applicant)))
            .collect();

        Ok(Some(JobDetail::assemble(
            &job,
            companies.get(&job.company),
            populated,
        )))
    }

    /// Append an application back-reference to a job.
    pub async fn push_application(&self, job_id: &ObjectId, app_id: &ObjectId) -> DbResult<()> {
        self.jobs
            .update_one(
                doc! { "_id": *job_id },
                doc! {
                    "$push": { "applications": *app_id },
                    "$set": { "updatedAt": DateTime::now() },
                },
            )
            .await?;
        Ok(())
    }
}
