//! Company repository.

use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Collection;
use tracing::info;

use jobboard_models::Company;

use crate::client::{collections, MongoClient};
use crate::error::DbResult;

/// Repository for company documents.
#[derive(Clone)]
pub struct CompanyRepo {
    companies: Collection<Company>,
}

impl CompanyRepo {
    pub fn new(store: &MongoClient) -> Self {
        Self {
            companies: store.collection(collections::COMPANIES),
        }
    }

    /// Exact-match lookup by trimmed name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Company>> {
        Ok(self.companies.find_one(doc! { "name": name }).await?)
    }

    /// All companies owned by `user_id`.
    pub async fn find_by_owner(&self, user_id: &ObjectId) -> DbResult<Vec<Company>> {
        let cursor = self.companies.find(doc! { "userId": *user_id }).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Lookup by id string. Malformed ids resolve to `None`, the same as a
    /// missing record.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Company>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.companies.find_one(doc! { "_id": oid }).await?)
    }

    /// Lookup scoped to the owner. Nonexistence and foreign ownership are
    /// indistinguishable to the caller.
    pub async fn find_by_id_and_owner(
        &self,
        id: &str,
        owner: &ObjectId,
    ) -> DbResult<Option<Company>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self
            .companies
            .find_one(doc! { "_id": oid, "userId": owner })
            .await?)
    }

    /// Whether another company (excluding `exclude`) already uses `name`.
    pub async fn name_taken_by_other(&self, name: &str, exclude: &ObjectId) -> DbResult<bool> {
        let existing = self
            .companies
            .find_one(doc! { "name": name, "_id": { "$ne": *exclude } })
            .await?;
        Ok(existing.is_some())
    }

    /// Batch lookup for joins: id -> company.
    pub async fn find_by_ids(
        &self,
        ids: &[ObjectId],
    ) -> DbResult<std::collections::HashMap<ObjectId, Company>> {
        if ids.is_empty() {
            return Ok(Default::default());
        }
        let cursor = self
            .companies
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        let companies: Vec<Company> = cursor.try_collect().await?;
        Ok(companies.into_iter().map(|c| (c.id, c)).collect())
    }

    /// Insert a new company. A raced duplicate name surfaces as a
    /// duplicate-key error from the unique index.
    pub async fn insert(&self, company: &Company) -> DbResult<()> {
        self.companies.insert_one(company).await?;
        info!(company_id = %company.id, name = %company.name, "Registered company");
        Ok(())
    }

    /// Persist a modified company record wholesale.
    pub async fn save(&self, company: &Company) -> DbResult<()> {
        self.companies
            .replace_one(doc! { "_id": company.id }, company)
            .await?;
        Ok(())
    }
}
