use std::sync::Arc;

use crate::{
    auth::{
        jwt::TokenService,
        repo::{PgUserRepo, UserRepo},
    },
    config::{AppConfig, JwtConfig},
    db,
    memory::{MemoryLeaderboard, MemoryOwnedRepo, MemoryUserRepo},
    owned::OwnedRepo,
    scores::{
        repo::{Leaderboard, PgScoreRepo},
        repo_types::Score,
    },
    tasks::{repo::PgTaskRepo, repo_types::Task},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: TokenService,
    pub users: Arc<dyn UserRepo>,
    pub tasks: Arc<dyn OwnedRepo<Task>>,
    pub scores: Arc<dyn OwnedRepo<Score>>,
    pub leaderboard: Arc<dyn Leaderboard>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let db = db::connect(&config).await?;
        let scores = Arc::new(PgScoreRepo::new(db.clone()));

        Ok(Self {
            tokens: TokenService::new(&config.jwt),
            users: Arc::new(PgUserRepo::new(db.clone())),
            tasks: Arc::new(PgTaskRepo::new(db)),
            scores: scores.clone(),
            leaderboard: scores,
            config,
        })
    }

    /// State backed by in-memory stores; no database required.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: "memory://".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test".into(),
                ttl_minutes: 60 * 24,
            },
        });

        let users = Arc::new(MemoryUserRepo::default());
        let scores = Arc::new(MemoryOwnedRepo::<Score>::default());
        let leaderboard = Arc::new(MemoryLeaderboard::new(users.clone(), scores.clone()));

        Self {
            tokens: TokenService::new(&config.jwt),
            users,
            tasks: Arc::new(MemoryOwnedRepo::<Task>::default()),
            scores,
            leaderboard,
            config,
        }
    }
}
