use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{LeaderboardRow, Score, ScoreFields};
use crate::owned::OwnedRepo;

/// Public, cross-user view of the best scores.
#[async_trait]
pub trait Leaderboard: Send + Sync {
    /// Highest value first; ties go to the earlier score.
    async fn top(&self, limit: i64) -> anyhow::Result<Vec<LeaderboardRow>>;
}

#[derive(Clone)]
pub struct PgScoreRepo {
    db: PgPool,
}

impl PgScoreRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OwnedRepo<Score> for PgScoreRepo {
    async fn create(&self, owner_id: i64, f: ScoreFields) -> anyhow::Result<Score> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO scores (user_id, value)
            VALUES ($1, $2)
            RETURNING id, user_id, value, created_at
            "#,
        )
        .bind(owner_id)
        .bind(f.value)
        .fetch_one(&self.db)
        .await
        .context("insert score")?;
        Ok(score)
    }

    async fn list(&self, owner_id: i64) -> anyhow::Result<Vec<Score>> {
        let rows = sqlx::query_as::<_, Score>(
            r#"
            SELECT id, user_id, value, created_at
              FROM scores
             WHERE user_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list scores by user")?;
        Ok(rows)
    }

    async fn get(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Score>> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            SELECT id, user_id, value, created_at
              FROM scores
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("get score")?;
        Ok(score)
    }

    async fn update(&self, id: i64, owner_id: i64, f: ScoreFields) -> anyhow::Result<Option<Score>> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            UPDATE scores
               SET value = $3
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, value, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(f.value)
        .fetch_optional(&self.db)
        .await
        .context("update score")?;
        Ok(score)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Score>> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            DELETE FROM scores
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, value, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("delete score")?;
        Ok(score)
    }
}

#[async_trait]
impl Leaderboard for PgScoreRepo {
    async fn top(&self, limit: i64) -> anyhow::Result<Vec<LeaderboardRow>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(
            r#"
            SELECT s.id, s.value, s.created_at, u.id AS user_id, u.username
              FROM scores s
              JOIN users u ON u.id = s.user_id
             ORDER BY s.value DESC, s.id ASC
             LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("leaderboard")?;
        Ok(rows)
    }
}
