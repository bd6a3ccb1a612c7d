use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::{
    maintenance::{CreatePlantMaintenance, PlantMaintenance, UpdatePlantMaintenance},
    plant::Plant,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub const NO_TASKS_MESSAGE: &str = "The selected plant has no assigned maintenance tasks.";

fn validate_task(data: &CreatePlantMaintenance) -> Result<(), ApiError> {
    if data.task_description.trim().is_empty() {
        return Err(ApiError::Validation(
            "task description must not be empty".into(),
        ));
    }
    if !(1..=12).contains(&data.month) {
        return Err(ApiError::Validation("month must be between 1 and 12".into()));
    }
    Ok(())
}

/// POST /api/maintenance
pub async fn create_task(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreatePlantMaintenance>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<PlantMaintenance>>), ApiError> {
    validate_task(&payload)?;
    Plant::find_by_id(&state.db.pool, payload.plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    let task = PlantMaintenance::create(&state.db.pool, &payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(task))))
}

/// GET /api/plants/{plant_id}/maintenance
pub async fn list_tasks_for_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<PlantMaintenance>>>, ApiError> {
    Plant::find_by_id(&state.db.pool, plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    let tasks = PlantMaintenance::find_by_plant_id(&state.db.pool, plant_id).await?;
    let response = if tasks.is_empty() {
        ApiResponse::success_with_message(tasks, NO_TASKS_MESSAGE)
    } else {
        ApiResponse::success(tasks)
    };
    Ok(ResponseJson(response))
}

/// PUT /api/maintenance/{task_id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdatePlantMaintenance>,
) -> Result<ResponseJson<ApiResponse<PlantMaintenance>>, ApiError> {
    validate_task(&payload)?;
    Plant::find_by_id(&state.db.pool, payload.plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    let task = PlantMaintenance::update(&state.db.pool, task_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

/// DELETE /api/maintenance/{task_id}
pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let deleted = PlantMaintenance::delete(&state.db.pool, task_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("maintenance task"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/maintenance", post(create_task))
        .route("/maintenance/{task_id}", put(update_task).delete(delete_task))
        .route("/plants/{plant_id}/maintenance", get(list_tasks_for_plant))
}
