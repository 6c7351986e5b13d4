//! Ownership-scoped CRUD shared by every per-user resource.
//!
//! Every lookup filters by resource id and owner id together, so a row that
//! belongs to somebody else is reported exactly like a row that does not exist.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
};

/// A record that belongs to exactly one user.
pub trait OwnedResource: Clone + Send + Sync + 'static {
    /// Client-mutable fields, replaced wholesale on update.
    type Fields: Clone + Send + Sync + 'static;

    /// Human name used in not-found messages.
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn owner_id(&self) -> i64;

    /// Builds a fresh record, used by stores that assign ids themselves.
    fn materialize(id: i64, owner_id: i64, fields: Self::Fields, now: OffsetDateTime) -> Self;

    fn replace_fields(&mut self, fields: Self::Fields, now: OffsetDateTime);
}

#[async_trait]
pub trait OwnedRepo<R: OwnedResource>: Send + Sync {
    async fn create(&self, owner_id: i64, fields: R::Fields) -> anyhow::Result<R>;
    /// All rows of `owner_id`, oldest first.
    async fn list(&self, owner_id: i64) -> anyhow::Result<Vec<R>>;
    async fn get(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<R>>;
    async fn update(&self, id: i64, owner_id: i64, fields: R::Fields)
        -> anyhow::Result<Option<R>>;
    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<R>>;
}

/// A repository bound to the authenticated caller.
///
/// The owner id can only come from an [`AuthUser`], never from request input.
pub struct Scoped<'a, R: OwnedResource> {
    repo: &'a dyn OwnedRepo<R>,
    owner_id: i64,
}

impl<'a, R: OwnedResource> Scoped<'a, R> {
    pub fn new(repo: &'a dyn OwnedRepo<R>, user: &AuthUser) -> Self {
        Self {
            repo,
            owner_id: user.id(),
        }
    }

    pub async fn create(&self, fields: R::Fields) -> ApiResult<R> {
        Ok(self.repo.create(self.owner_id, fields).await?)
    }

    pub async fn list(&self) -> ApiResult<Vec<R>> {
        Ok(self.repo.list(self.owner_id).await?)
    }

    pub async fn get(&self, id: i64) -> ApiResult<R> {
        self.repo
            .get(id, self.owner_id)
            .await?
            .ok_or(ApiError::NotFound(R::KIND))
    }

    pub async fn update(&self, id: i64, fields: R::Fields) -> ApiResult<R> {
        self.repo
            .update(id, self.owner_id, fields)
            .await?
            .ok_or(ApiError::NotFound(R::KIND))
    }

    pub async fn delete(&self, id: i64) -> ApiResult<R> {
        self.repo
            .delete(id, self.owner_id)
            .await?
            .ok_or(ApiError::NotFound(R::KIND))
    }
}
