//! User repository.

use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Collection;
use tracing::info;

use jobboard_models::User;

use crate::client::{collections, MongoClient};
use crate::error::DbResult;

/// Repository for user documents.
#[derive(Clone)]
pub struct UserRepo {
    users: Collection<User>,
}

impl UserRepo {
    pub fn new(store: &MongoClient) -> Self {
        Self {
            users: store.collection(collections::USERS),
        }
    }

    /// Exact-match lookup by (lowercased) email.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> DbResult<Option<User>> {
        Ok(self.users.find_one(doc! { "_id": *id }).await?)
    }

    /// Whether `email` belongs to a user other than `exclude`.
    pub async fn email_taken_by_other(&self, email: &str, exclude: &ObjectId) -> DbResult<bool> {
        let existing = self
            .users
            .find_one(doc! { "email": email, "_id": { "$ne": *exclude } })
            .await?;
        Ok(existing.is_some())
    }

    /// Insert a new user. A raced duplicate email surfaces as a
    /// duplicate-key error from the unique index.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        self.users.insert_one(user).await?;
        info!(user_id = %user.id, "Created user");
        Ok(())
    }

    /// Persist a modified user record wholesale.
    pub async fn save(&self, user: &User) -> DbResult<()> {
        self.users.replace_one(doc! { "_id": user.id }, user).await?;
        Ok(())
    }
}
