use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    garden::{CreateGarden, Garden, UpdateGarden},
    planting::{Planting, PlantingWithPlant},
    user::User,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError};

pub const NO_PLANTS_MESSAGE: &str = "There are no plants in your garden yet.";

/// A garden together with its plantings, as shown on the detail page.
#[derive(Debug, Serialize, TS)]
pub struct GardenDetails {
    pub garden: Garden,
    pub plants: Vec<PlantingWithPlant>,
}

#[derive(Debug, Deserialize, TS)]
pub struct ShareGardenRequest {
    pub username: String,
}

fn validate_garden(data: &CreateGarden) -> Result<(), ApiError> {
    if data.name.trim().is_empty() {
        return Err(ApiError::Validation("garden name must not be empty".into()));
    }
    Ok(())
}

/// Look up the garden and check that `user` owns it.
pub(crate) async fn owned_garden(
    state: &AppState,
    user: &CurrentUser,
    garden_id: Uuid,
) -> Result<Garden, ApiError> {
    let garden = Garden::find_by_id(&state.db.pool, garden_id)
        .await?
        .ok_or(ApiError::NotFound("garden"))?;
    if !Garden::is_owned_by(&state.db.pool, garden_id, user.0.id).await? {
        return Err(ApiError::Forbidden);
    }
    Ok(garden)
}

/// POST /api/gardens — the creator becomes the garden's owner.
pub async fn create_garden(
    State(state): State<AppState>,
    user: CurrentUser,
    axum::Json(payload): axum::Json<CreateGarden>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Garden>>), ApiError> {
    validate_garden(&payload)?;
    let garden = Garden::create(&state.db.pool, &payload, user.0.id).await?;
    tracing::info!(garden = %garden.name, owner = %user.0.username, "garden created");
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(garden)),
    ))
}

/// GET /api/gardens — gardens owned by the current user.
pub async fn list_gardens(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<ResponseJson<ApiResponse<Vec<Garden>>>, ApiError> {
    let gardens = Garden::find_by_user(&state.db.pool, user.0.id).await?;
    Ok(ResponseJson(ApiResponse::success(gardens)))
}

/// GET /api/gardens/{garden_id}
pub async fn garden_details(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(garden_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<GardenDetails>>, ApiError> {
    let garden = Garden::find_by_id(&state.db.pool, garden_id)
        .await?
        .ok_or(ApiError::NotFound("garden"))?;
    let plants = Planting::find_by_garden_id(&state.db.pool, garden_id).await?;
    let details = GardenDetails { garden, plants };
    let response = if details.plants.is_empty() {
        ApiResponse::success_with_message(details, NO_PLANTS_MESSAGE)
    } else {
        ApiResponse::success(details)
    };
    Ok(ResponseJson(response))
}

/// PUT /api/gardens/{garden_id} — owner only.
pub async fn update_garden(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(garden_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdateGarden>,
) -> Result<ResponseJson<ApiResponse<Garden>>, ApiError> {
    validate_garden(&payload)?;
    owned_garden(&state, &user, garden_id).await?;
    let garden = Garden::update(&state.db.pool, garden_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(garden)))
}

/// POST /api/gardens/{garden_id}/owners — owner only; grants another user
/// co-ownership.
pub async fn share_garden(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(garden_id): Path<Uuid>,
    axum::Json(payload): axum::Json<ShareGardenRequest>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    owned_garden(&state, &user, garden_id).await?;
    let grantee = User::find_by_username(&state.db.pool, &payload.username)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Garden::add_owner(&state.db.pool, garden_id, grantee.id).await?;
    tracing::info!(garden = %garden_id, grantee = %grantee.username, "garden shared");
    Ok(ResponseJson(ApiResponse::success(())))
}

/// DELETE /api/gardens/{garden_id} — owner only; cascades plantings.
pub async fn delete_garden(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(garden_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    owned_garden(&state, &user, garden_id).await?;
    Garden::delete(&state.db.pool, garden_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/gardens", get(list_gardens).post(create_garden))
        .route(
            "/gardens/{garden_id}",
            get(garden_details).put(update_garden).delete(delete_garden),
        )
        .route("/gardens/{garden_id}/owners", post(share_garden))
}
