use sqlx::FromRow;
use time::OffsetDateTime;

use crate::owned::OwnedResource;

/// Task record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
}

impl OwnedResource for Task {
    type Fields = TaskFields;
    const KIND: &'static str = "Task";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn materialize(id: i64, owner_id: i64, f: TaskFields, now: OffsetDateTime) -> Self {
        Self {
            id,
            user_id: owner_id,
            title: f.title,
            description: f.description,
            status: f.status,
            priority: f.priority,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace_fields(&mut self, f: TaskFields, now: OffsetDateTime) {
        self.title = f.title;
        self.description = f.description;
        self.status = f.status;
        self.priority = f.priority;
        self.updated_at = now;
    }
}
