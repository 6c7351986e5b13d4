use sqlx::FromRow;
use time::OffsetDateTime;

use crate::owned::OwnedResource;

/// Score record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Score {
    pub id: i64,
    pub user_id: i64,
    pub value: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreFields {
    pub value: i64,
}

impl OwnedResource for Score {
    type Fields = ScoreFields;
    const KIND: &'static str = "Score";

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn materialize(id: i64, owner_id: i64, f: ScoreFields, now: OffsetDateTime) -> Self {
        Self {
            id,
            user_id: owner_id,
            value: f.value,
            created_at: now,
        }
    }

    fn replace_fields(&mut self, f: ScoreFields, _now: OffsetDateTime) {
        self.value = f.value;
    }
}

/// Score joined with its owner's username.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub id: i64,
    pub value: i64,
    pub created_at: OffsetDateTime,
    pub user_id: i64,
    pub username: String,
}
