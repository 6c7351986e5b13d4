use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{TaskDeleted, TaskRequest, TaskResponse},
    repo_types::{Task, TaskFields},
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiResult,
    owned::Scoped,
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

fn scoped<'a>(state: &'a AppState, user: &AuthUser) -> Scoped<'a, Task> {
    Scoped::new(state.tasks.as_ref(), user)
}

#[instrument(skip_all, fields(user_id = user.id()))]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = scoped(&state, &user).list().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

#[instrument(skip_all, fields(user_id = user.id()))]
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let fields = TaskFields::try_from(body)?;
    let task = scoped(&state, &user).create(fields).await?;
    info!(task_id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(task.into())))
}

#[instrument(skip_all, fields(user_id = user.id(), task_id = id))]
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskResponse>> {
    let task = scoped(&state, &user).get(id).await?;
    Ok(Json(task.into()))
}

#[instrument(skip_all, fields(user_id = user.id(), task_id = id))]
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<TaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let fields = TaskFields::try_from(body)?;
    let task = scoped(&state, &user).update(id, fields).await?;
    Ok(Json(task.into()))
}

#[instrument(skip_all, fields(user_id = user.id(), task_id = id))]
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDeleted>> {
    let task = scoped(&state, &user).delete(id).await?;
    info!("task deleted");
    Ok(Json(TaskDeleted {
        msg: "Task deleted successfully",
        id: task.id,
    }))
}
