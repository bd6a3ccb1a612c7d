use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{post, put},
};
use db::models::{
    garden::Garden,
    plant::Plant,
    planting::{CreatePlanting, Planting, UpdatePlanting},
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError, routes::gardens::owned_garden};

/// Look up the planting and check that `user` owns its garden.
pub(crate) async fn owned_planting(
    state: &AppState,
    user: &CurrentUser,
    planting_id: Uuid,
) -> Result<Planting, ApiError> {
    let planting = Planting::find_by_id(&state.db.pool, planting_id)
        .await?
        .ok_or(ApiError::NotFound("planting"))?;
    if !Garden::is_owned_by(&state.db.pool, planting.garden_id, user.0.id).await? {
        return Err(ApiError::Forbidden);
    }
    Ok(planting)
}

fn validate_location(location: &str) -> Result<(), ApiError> {
    if location.trim().is_empty() {
        return Err(ApiError::Validation("location must not be empty".into()));
    }
    Ok(())
}

/// POST /api/gardens/{garden_id}/plantings
pub async fn add_plant_to_garden(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(garden_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreatePlanting>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Planting>>), ApiError> {
    validate_location(&payload.location)?;
    owned_garden(&state, &user, garden_id).await?;
    Plant::find_by_id(&state.db.pool, payload.plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    let planting = Planting::create(&state.db.pool, garden_id, &payload).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(planting)),
    ))
}

/// PUT /api/plantings/{planting_id}
pub async fn update_planting(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(planting_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdatePlanting>,
) -> Result<ResponseJson<ApiResponse<Planting>>, ApiError> {
    validate_location(&payload.location)?;
    owned_planting(&state, &user, planting_id).await?;
    let planting = Planting::update(&state.db.pool, planting_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(planting)))
}

/// DELETE /api/plantings/{planting_id} — cascades schedules.
pub async fn delete_planting(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(planting_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    owned_planting(&state, &user, planting_id).await?;
    Planting::delete(&state.db.pool, planting_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gardens/{garden_id}/plantings", post(add_plant_to_garden))
        .route(
            "/plantings/{planting_id}",
            put(update_planting).delete(delete_planting),
        )
}
