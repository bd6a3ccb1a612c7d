use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, put},
};
use chrono::{NaiveDate, Utc};
use db::models::{
    maintenance::PlantMaintenance,
    schedule::{CreateSchedule, MaintenanceSchedule, ScheduleStatus},
};
use serde::Deserialize;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError, routes::plantings::owned_planting};

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    #[serde(flatten)]
    pub schedule: CreateSchedule,
    pub completion_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub status: ScheduleStatus,
    pub completion_date: Option<NaiveDate>,
}

fn validate_month(month: i32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation("month must be between 1 and 12".into()));
    }
    Ok(())
}

/// A done schedule gets a completion date, today when none was supplied.
/// Any other status clears it.
fn completion_date_for(status: ScheduleStatus, provided: Option<NaiveDate>) -> Option<NaiveDate> {
    match status {
        ScheduleStatus::Done => Some(provided.unwrap_or_else(|| Utc::now().date_naive())),
        _ => None,
    }
}

/// POST /api/plantings/{planting_id}/schedules — creates or refreshes the
/// record for the same task and month.
pub async fn upsert_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(planting_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateScheduleRequest>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<MaintenanceSchedule>>), ApiError> {
    validate_month(payload.schedule.month)?;
    let planting = owned_planting(&state, &user, planting_id).await?;
    let task = PlantMaintenance::find_by_id(&state.db.pool, payload.schedule.maintenance_id)
        .await?
        .ok_or(ApiError::NotFound("maintenance task"))?;
    if task.plant_id != planting.plant_id {
        return Err(ApiError::Validation(
            "maintenance task belongs to a different plant".into(),
        ));
    }

    let status = payload.schedule.status.unwrap_or_default();
    let completion_date = completion_date_for(status, payload.completion_date);
    let schedule = MaintenanceSchedule::upsert(
        &state.db.pool,
        planting_id,
        &payload.schedule,
        completion_date,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(schedule)),
    ))
}

/// GET /api/plantings/{planting_id}/schedules?month=
pub async fn list_schedules(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(planting_id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<MaintenanceSchedule>>>, ApiError> {
    if let Some(month) = query.month {
        validate_month(month)?;
    }
    owned_planting(&state, &user, planting_id).await?;
    let schedules =
        MaintenanceSchedule::find_by_planting_id(&state.db.pool, planting_id, query.month).await?;
    Ok(ResponseJson(ApiResponse::success(schedules)))
}

/// PUT /api/schedules/{schedule_id}
pub async fn update_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(schedule_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateScheduleRequest>,
) -> Result<ResponseJson<ApiResponse<MaintenanceSchedule>>, ApiError> {
    let schedule = MaintenanceSchedule::find_by_id(&state.db.pool, schedule_id)
        .await?
        .ok_or(ApiError::NotFound("schedule"))?;
    owned_planting(&state, &user, schedule.planting_id).await?;

    let completion_date = completion_date_for(payload.status, payload.completion_date);
    let schedule =
        MaintenanceSchedule::set_status(&state.db.pool, schedule_id, payload.status, completion_date)
            .await?;
    Ok(ResponseJson(ApiResponse::success(schedule)))
}

/// DELETE /api/schedules/{schedule_id}
pub async fn delete_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(schedule_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let schedule = MaintenanceSchedule::find_by_id(&state.db.pool, schedule_id)
        .await?
        .ok_or(ApiError::NotFound("schedule"))?;
    owned_planting(&state, &user, schedule.planting_id).await?;
    MaintenanceSchedule::delete(&state.db.pool, schedule_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/plantings/{planting_id}/schedules",
            get(list_schedules).post(upsert_schedule),
        )
        .route(
            "/schedules/{schedule_id}",
            put(update_schedule).delete(delete_schedule),
        )
}
