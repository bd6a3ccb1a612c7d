use axum::{
    Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use services::services::monthly_tasks::{MonthlyTasks, MonthlyTasksService};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub const NO_MONTHLY_TASKS_MESSAGE: &str = "No maintenance tasks are due for this garden.";

#[derive(Debug, Deserialize)]
pub struct MonthlyTasksQuery {
    pub month: Option<i32>,
    pub page: Option<String>,
}

/// GET /api/gardens/{garden_id}/monthly-tasks?month=&page=
pub async fn garden_monthly_tasks(
    State(state): State<AppState>,
    Path(garden_id): Path<Uuid>,
    Query(query): Query<MonthlyTasksQuery>,
) -> Result<ResponseJson<ApiResponse<MonthlyTasks>>, ApiError> {
    let tasks = MonthlyTasksService::garden_tasks(
        &state.db.pool,
        garden_id,
        query.month,
        query.page.as_deref(),
    )
    .await?;
    let response = if tasks.tasks.items.is_empty() {
        ApiResponse::success_with_message(tasks, NO_MONTHLY_TASKS_MESSAGE)
    } else {
        ApiResponse::success(tasks)
    };
    Ok(ResponseJson(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/gardens/{garden_id}/monthly-tasks", get(garden_monthly_tasks))
}
