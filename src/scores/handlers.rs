use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{LeaderboardEntry, LeaderboardQuery, ScoreDeleted, ScoreRequest, ScoreResponse},
    repo_types::Score,
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiResult,
    owned::Scoped,
    state::AppState,
};

pub fn score_routes() -> Router<AppState> {
    Router::new()
        .route("/scores", get(list_scores).post(create_score))
        .route(
            "/scores/:id",
            get(get_score).put(update_score).delete(delete_score),
        )
}

pub fn leaderboard_routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(leaderboard))
}

fn scoped<'a>(state: &'a AppState, user: &AuthUser) -> Scoped<'a, Score> {
    Scoped::new(state.scores.as_ref(), user)
}

#[instrument(skip_all, fields(user_id = user.id()))]
pub async fn list_scores(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ScoreResponse>>> {
    let scores = scoped(&state, &user).list().await?;
    Ok(Json(scores.into_iter().map(ScoreResponse::from).collect()))
}

#[instrument(skip_all, fields(user_id = user.id()))]
pub async fn create_score(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ScoreRequest>,
) -> ApiResult<(StatusCode, Json<ScoreResponse>)> {
    let score = scoped(&state, &user).create(body.into()).await?;
    info!(score_id = score.id, value = score.value, "score recorded");
    Ok((StatusCode::CREATED, Json(score.into())))
}

#[instrument(skip_all, fields(user_id = user.id(), score_id = id))]
pub async fn get_score(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ScoreResponse>> {
    let score = scoped(&state, &user).get(id).await?;
    Ok(Json(score.into()))
}

#[instrument(skip_all, fields(user_id = user.id(), score_id = id))]
pub async fn update_score(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<ScoreRequest>,
) -> ApiResult<Json<ScoreResponse>> {
    let score = scoped(&state, &user).update(id, body.into()).await?;
    Ok(Json(score.into()))
}

#[instrument(skip_all, fields(user_id = user.id(), score_id = id))]
pub async fn delete_score(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<ScoreDeleted>> {
    let score = scoped(&state, &user).delete(id).await?;
    Ok(Json(ScoreDeleted {
        msg: "Score deleted successfully",
        id: score.id,
    }))
}

#[instrument(skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(q): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let rows = state.leaderboard.top(q.clamped()).await?;
    Ok(Json(rows.into_iter().map(LeaderboardEntry::from).collect()))
}
