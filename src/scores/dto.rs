use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{LeaderboardRow, Score, ScoreFields};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub value: i64,
}

impl From<ScoreRequest> for ScoreFields {
    fn from(req: ScoreRequest) -> Self {
        Self { value: req.value }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub id: i64,
    pub user_id: i64,
    pub value: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Score> for ScoreResponse {
    fn from(s: Score) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            value: s.value,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreDeleted {
    pub msg: &'static str,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ScoreOwner {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub value: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user: ScoreOwner,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(r: LeaderboardRow) -> Self {
        Self {
            id: r.id,
            value: r.value,
            created_at: r.created_at,
            user: ScoreOwner {
                id: r.user_id,
                username: r.username,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}

impl LeaderboardQuery {
    pub const MAX_LIMIT: i64 = 100;

    pub fn clamped(&self) -> i64 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}
