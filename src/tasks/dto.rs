use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{Task, TaskFields};
use crate::error::ApiError;

/// Body for both create and full update.
#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
}

impl TryFrom<TaskRequest> for TaskFields {
    type Error = ApiError;

    fn try_from(req: TaskRequest) -> Result<Self, Self::Error> {
        let title = req.title.trim().to_string();
        let status = req.status.trim().to_string();
        let priority = req.priority.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".into()));
        }
        if status.is_empty() {
            return Err(ApiError::BadRequest("status must not be empty".into()));
        }
        if priority.is_empty() {
            return Err(ApiError::BadRequest("priority must not be empty".into()));
        }
        Ok(TaskFields {
            title,
            description: req.description,
            status,
            priority,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            title: t.title,
            description: t.description,
            status: t.status,
            priority: t.priority,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskDeleted {
    pub msg: &'static str,
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(title: &str, status: &str, priority: &str) -> TaskRequest {
        TaskRequest {
            title: title.into(),
            description: None,
            status: status.into(),
            priority: priority.into(),
        }
    }

    #[test]
    fn trims_and_accepts_valid_request() {
        let f = TaskFields::try_from(req("  t1 ", "todo", "low")).unwrap();
        assert_eq!(f.title, "t1");
        assert_eq!(f.status, "todo");
    }

    #[test]
    fn rejects_blank_fields() {
        assert!(TaskFields::try_from(req(" ", "todo", "low")).is_err());
        assert!(TaskFields::try_from(req("t", "", "low")).is_err());
        assert!(TaskFields::try_from(req("t", "todo", "")).is_err());
    }
}
