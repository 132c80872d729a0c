use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tasks/:task_id/subtasks", post(handlers::form_add_subtask))
        .route(
            "/tasks/:task_id/subtasks/:subtask_id/toggle",
            post(handlers::form_toggle_subtask),
        )
        .route(
            "/tasks/:task_id/subtasks/:subtask_id/delete",
            post(handlers::form_delete_subtask),
        )
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/analytics/time", get(handlers::get_time_analytics))
        .route("/api/analytics/top", get(handlers::get_top_tasks))
        .route("/api/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/api/tasks/:task_id", delete(handlers::delete_task))
        .route("/api/tasks/:task_id/status", put(handlers::update_status))
        .route("/api/tasks/:task_id/time", post(handlers::log_time))
        .route(
            "/api/tasks/:task_id/subtasks",
            get(handlers::list_subtasks).post(handlers::add_subtask),
        )
        .route(
            "/api/tasks/:task_id/subtasks/:subtask_id",
            delete(handlers::delete_subtask),
        )
        .route(
            "/api/tasks/:task_id/subtasks/:subtask_id/toggle",
            post(handlers::toggle_subtask),
        )
        .with_state(state)
}
