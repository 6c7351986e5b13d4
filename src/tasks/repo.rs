use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Task, TaskFields};
use crate::owned::OwnedRepo;

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OwnedRepo<Task> for PgTaskRepo {
    async fn create(&self, owner_id: i64, f: TaskFields) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, status, priority)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, status, priority, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(f.title)
        .bind(f.description)
        .bind(f.status)
        .bind(f.priority)
        .fetch_one(&self.db)
        .await
        .context("insert task")?;
        Ok(task)
    }

    async fn list(&self, owner_id: i64) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority, created_at, updated_at
              FROM tasks
             WHERE user_id = $1
             ORDER BY id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list tasks by user")?;
        Ok(rows)
    }

    async fn get(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority, created_at, updated_at
              FROM tasks
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("get task")?;
        Ok(task)
    }

    async fn update(&self, id: i64, owner_id: i64, f: TaskFields) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
               SET title = $3, description = $4, status = $5, priority = $6, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, priority, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(f.title)
        .bind(f.description)
        .bind(f.status)
        .bind(f.priority)
        .fetch_optional(&self.db)
        .await
        .context("update task")?;
        Ok(task)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            DELETE FROM tasks
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, status, priority, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.db)
        .await
        .context("delete task")?;
        Ok(task)
    }
}
