use crate::errors::{AppError, StoreError};
use crate::models::{
    AddSubtaskRequest, AnalyticsResponse, AppData, LogTimeRequest, NewTask, StatusRequest,
    Subtask, SubtasksResponse, Task, TaskStatus, TaskView, TimeAnalytics, TopTask, TopTasksQuery,
};
use crate::state::AppState;
use crate::stats::{
    build_analytics, subtask_progress, time_analytics, to_top_task, top_tasks_by_time,
};
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let analytics = build_analytics(&data, state.top_tasks_limit);
    Html(render_index(&analytics, &data.tasks))
}

pub async fn get_analytics(
    State(state): State<AppState>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_analytics(&data, state.top_tasks_limit)))
}

pub async fn get_time_analytics(
    State(state): State<AppState>,
) -> Result<Json<TimeAnalytics>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(time_analytics(&data.tasks)))
}

pub async fn get_top_tasks(
    State(state): State<AppState>,
    Query(query): Query<TopTasksQuery>,
) -> Result<Json<Vec<TopTask>>, AppError> {
    let limit = query.limit.unwrap_or(state.top_tasks_limit);
    let data = state.data.lock().await;
    let top: Vec<TopTask> = top_tasks_by_time(&data.tasks, limit)
        .into_iter()
        .map(to_top_task)
        .collect();
    debug!("top tasks requested: limit={limit}, found={}", top.len());
    Ok(Json(top))
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskView>>, AppError> {
    let data = state.data.lock().await;
    let views = data.tasks.iter().cloned().map(to_view).collect();
    Ok(Json(views))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<NewTask>,
) -> Result<(StatusCode, Json<TaskView>), AppError> {
    let task = commit(&state, |data| data.add_task(payload, today())).await?;

    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(to_view(task))))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = commit(&state, |data| data.delete_task(&task_id)).await?;

    info!(task_id = %task.id, subtasks = task.subtasks.len(), "task deleted");
    Ok(Json(task))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<TaskView>, AppError> {
    let status: TaskStatus = payload.status.parse()?;
    let task = commit(&state, |data| data.set_task_status(&task_id, status, today())).await?;

    info!(task_id = %task.id, status = %task.status, "task status changed");
    Ok(Json(to_view(task)))
}

pub async fn log_time(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<LogTimeRequest>,
) -> Result<Json<TaskView>, AppError> {
    let task = commit(&state, |data| data.log_time(&task_id, payload.seconds)).await?;

    debug!(task_id = %task.id, seconds = payload.seconds, "time logged");
    Ok(Json(to_view(task)))
}

pub async fn list_subtasks(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<SubtasksResponse>, AppError> {
    let data = state.data.lock().await;
    let task = data.task(&task_id)?;
    Ok(Json(SubtasksResponse {
        subtasks: task.subtasks.clone(),
        progress: subtask_progress(&task.subtasks),
    }))
}

pub async fn add_subtask(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(payload): Json<AddSubtaskRequest>,
) -> Result<(StatusCode, Json<Subtask>), AppError> {
    let subtask = apply_add_subtask(&state, &task_id, &payload.title).await?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

pub async fn toggle_subtask(
    State(state): State<AppState>,
    Path((task_id, subtask_id)): Path<(String, String)>,
) -> Result<Json<Subtask>, AppError> {
    let subtask = apply_toggle_subtask(&state, &task_id, &subtask_id).await?;
    Ok(Json(subtask))
}

pub async fn delete_subtask(
    State(state): State<AppState>,
    Path((task_id, subtask_id)): Path<(String, String)>,
) -> Result<Json<Subtask>, AppError> {
    let subtask = apply_delete_subtask(&state, &task_id, &subtask_id).await?;
    Ok(Json(subtask))
}

pub async fn form_add_subtask(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Form(payload): Form<AddSubtaskRequest>,
) -> Result<Redirect, AppError> {
    if !payload.title.trim().is_empty() {
        apply_add_subtask(&state, &task_id, &payload.title).await?;
    }
    Ok(Redirect::to("/"))
}

pub async fn form_toggle_subtask(
    State(state): State<AppState>,
    Path((task_id, subtask_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    apply_toggle_subtask(&state, &task_id, &subtask_id).await?;
    Ok(Redirect::to("/"))
}

pub async fn form_delete_subtask(
    State(state): State<AppState>,
    Path((task_id, subtask_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    apply_delete_subtask(&state, &task_id, &subtask_id).await?;
    Ok(Redirect::to("/"))
}

async fn apply_add_subtask(state: &AppState, task_id: &str, title: &str) -> Result<Subtask, AppError> {
    let subtask = commit(state, |data| data.add_subtask(task_id, title)).await?;

    info!(%task_id, subtask_id = %subtask.id, "subtask added");
    Ok(subtask)
}

async fn apply_toggle_subtask(
    state: &AppState,
    task_id: &str,
    subtask_id: &str,
) -> Result<Subtask, AppError> {
    let subtask = commit(state, |data| data.toggle_subtask_status(task_id, subtask_id)).await?;

    debug!(%task_id, %subtask_id, completed = subtask.is_completed, "subtask toggled");
    Ok(subtask)
}

async fn apply_delete_subtask(
    state: &AppState,
    task_id: &str,
    subtask_id: &str,
) -> Result<Subtask, AppError> {
    let subtask = commit(state, |data| data.delete_subtask(task_id, subtask_id)).await?;

    info!(%task_id, subtask_id = %subtask.id, "subtask deleted");
    Ok(subtask)
}

/// Applies `mutate` to a copy of the collection and swaps it in only once the
/// copy has been written to disk.
async fn commit<T>(
    state: &AppState,
    mutate: impl FnOnce(&mut AppData) -> Result<T, StoreError>,
) -> Result<T, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let value = mutate(&mut next)?;
    persist_data(&state.data_path, &next).await?;
    *data = next;
    Ok(value)
}

fn to_view(task: Task) -> TaskView {
    TaskView {
        subtask_progress: subtask_progress(&task.subtasks),
        task,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
