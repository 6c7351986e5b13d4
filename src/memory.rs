//! In-memory stores with the same contracts as the Postgres repositories.
//!
//! Each store serializes writes behind one lock, which gives the same
//! uniqueness and id/owner filtering guarantees the database provides.

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{CreateUserError, NewUser, User},
    },
    owned::{OwnedRepo, OwnedResource},
    scores::{
        repo::Leaderboard,
        repo_types::{LeaderboardRow, Score},
    },
};

struct Table<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: Vec::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    table: RwLock<Table<User>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, new: NewUser) -> Result<User, CreateUserError> {
        let mut table = self.table.write().await;
        if table.rows.iter().any(|u| u.username == new.username) {
            return Err(CreateUserError::DuplicateUsername);
        }
        if let Some(email) = &new.email {
            if table.rows.iter().any(|u| u.email.as_ref() == Some(email)) {
                return Err(CreateUserError::DuplicateEmail);
            }
        }
        let user = User {
            id: table.allocate_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }
}

pub struct MemoryOwnedRepo<R> {
    table: RwLock<Table<R>>,
}

impl<R> Default for MemoryOwnedRepo<R> {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }
}

impl<R: OwnedResource> MemoryOwnedRepo<R> {
    async fn snapshot(&self) -> Vec<R> {
        self.table.read().await.rows.clone()
    }
}

fn owned_row<R: OwnedResource>(row: &R, id: i64, owner_id: i64) -> bool {
    row.id() == id && row.owner_id() == owner_id
}

#[async_trait]
impl<R: OwnedResource> OwnedRepo<R> for MemoryOwnedRepo<R> {
    async fn create(&self, owner_id: i64, fields: R::Fields) -> anyhow::Result<R> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let row = R::materialize(id, owner_id, fields, OffsetDateTime::now_utc());
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn list(&self, owner_id: i64) -> anyhow::Result<Vec<R>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|r| r.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<R>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|r| owned_row(*r, id, owner_id)).cloned())
    }

    async fn update(
        &self,
        id: i64,
        owner_id: i64,
        fields: R::Fields,
    ) -> anyhow::Result<Option<R>> {
        let mut table = self.table.write().await;
        let Some(row) = table.rows.iter_mut().find(|r| owned_row(&**r, id, owner_id)) else {
            return Ok(None);
        };
        row.replace_fields(fields, OffsetDateTime::now_utc());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<R>> {
        let mut table = self.table.write().await;
        let Some(pos) = table.rows.iter().position(|r| owned_row(r, id, owner_id)) else {
            return Ok(None);
        };
        Ok(Some(table.rows.remove(pos)))
    }
}

/// Joins the in-memory score table with the in-memory users.
pub struct MemoryLeaderboard {
    users: Arc<MemoryUserRepo>,
    scores: Arc<MemoryOwnedRepo<Score>>,
}

impl MemoryLeaderboard {
    pub fn new(users: Arc<MemoryUserRepo>, scores: Arc<MemoryOwnedRepo<Score>>) -> Self {
        Self { users, scores }
    }
}

#[async_trait]
impl Leaderboard for MemoryLeaderboard {
    async fn top(&self, limit: i64) -> anyhow::Result<Vec<LeaderboardRow>> {
        let mut scores = self.scores.snapshot().await;
        scores.sort_by(|a, b| b.value.cmp(&a.value).then(a.id.cmp(&b.id)));

        let users = self.users.table.read().await;
        let rows = scores
            .into_iter()
            .filter_map(|s| {
                let owner = users.rows.iter().find(|u| u.id == s.user_id)?;
                Some(LeaderboardRow {
                    id: s.id,
                    value: s.value,
                    created_at: s.created_at,
                    user_id: owner.id,
                    username: owner.username.clone(),
                })
            })
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        scores::repo_types::ScoreFields,
        tasks::repo_types::{Task, TaskFields},
    };

    fn fields(title: &str) -> TaskFields {
        TaskFields {
            title: title.into(),
            description: None,
            status: "todo".into(),
            priority: "low".into(),
        }
    }

    #[tokio::test]
    async fn foreign_rows_are_invisible() {
        let repo = MemoryOwnedRepo::<Task>::default();
        let a = repo.create(1, fields("a")).await.unwrap();

        assert!(repo.get(a.id, 2).await.unwrap().is_none());
        assert!(repo.update(a.id, 2, fields("hijack")).await.unwrap().is_none());
        assert!(repo.delete(a.id, 2).await.unwrap().is_none());

        let still = repo.get(a.id, 1).await.unwrap().unwrap();
        assert_eq!(still.title, "a");
    }

    #[tokio::test]
    async fn list_is_per_owner_in_insertion_order() {
        let repo = MemoryOwnedRepo::<Task>::default();
        repo.create(1, fields("first")).await.unwrap();
        repo.create(2, fields("other")).await.unwrap();
        repo.create(1, fields("second")).await.unwrap();

        let titles: Vec<_> = repo
            .list(1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_bumps_timestamp() {
        let repo = MemoryOwnedRepo::<Task>::default();
        let t = repo.create(1, fields("old")).await.unwrap();
        let updated = repo
            .update(
                t.id,
                1,
                TaskFields {
                    title: "new".into(),
                    description: Some("d".into()),
                    status: "done".into(),
                    priority: "high".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.description.as_deref(), Some("d"));
        assert_eq!(updated.created_at, t.created_at);
        assert!(updated.updated_at >= t.updated_at);
    }

    #[tokio::test]
    async fn user_uniqueness_is_enforced() {
        let users = MemoryUserRepo::default();
        let new = |u: &str, e: Option<&str>| NewUser {
            username: u.into(),
            email: e.map(Into::into),
            password_hash: "h".into(),
        };
        users.create(new("alice", Some("a@x.io"))).await.unwrap();
        users.create(new("bob", None)).await.unwrap();
        users.create(new("carol", None)).await.unwrap();

        assert!(matches!(
            users.create(new("alice", None)).await,
            Err(CreateUserError::DuplicateUsername)
        ));
        assert!(matches!(
            users.create(new("dave", Some("a@x.io"))).await,
            Err(CreateUserError::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn leaderboard_orders_by_value_then_age() {
        let users = Arc::new(MemoryUserRepo::default());
        let scores = Arc::new(MemoryOwnedRepo::<Score>::default());
        let alice = users
            .create(NewUser {
                username: "alice".into(),
                email: None,
                password_hash: "h".into(),
            })
            .await
            .unwrap();
        for v in [10, 50, 50, 5] {
            scores.create(alice.id, ScoreFields { value: v }).await.unwrap();
        }

        let board = MemoryLeaderboard::new(users, scores);
        let top = board.top(3).await.unwrap();
        let got: Vec<_> = top.iter().map(|r| (r.value, r.id)).collect();
        assert_eq!(got, [(50, 2), (50, 3), (10, 1)]);
        assert!(top.iter().all(|r| r.username == "alice"));
    }
}
