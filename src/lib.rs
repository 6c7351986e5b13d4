//! Task-management and tetris-score API: password signup/login, JWT bearer
//! authentication and ownership-scoped CRUD over per-user resources.

pub mod app;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod owned;
pub mod scores;
pub mod state;
pub mod tasks;
