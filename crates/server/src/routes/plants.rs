use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::plant::{CreatePlant, Plant, UpdatePlant};
use serde::Deserialize;
use utils::{
    pagination::{Page, Paginator},
    response::ApiResponse,
};
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError};

pub const PLANTS_PER_PAGE: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

fn validate_plant(data: &CreatePlant) -> Result<(), ApiError> {
    if data.name.trim().is_empty() {
        return Err(ApiError::Validation("plant name must not be empty".into()));
    }
    if data.name.chars().count() > 100 {
        return Err(ApiError::Validation(
            "plant name must be at most 100 characters".into(),
        ));
    }
    if data.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "plant description must not be empty".into(),
        ));
    }
    Ok(())
}

/// POST /api/plants — superuser only.
pub async fn create_plant(
    State(state): State<AppState>,
    user: CurrentUser,
    axum::Json(payload): axum::Json<CreatePlant>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Plant>>), ApiError> {
    user.require_superuser()?;
    validate_plant(&payload)?;
    let plant = Plant::create(&state.db.pool, &payload).await?;
    tracing::info!(plant = %plant.name, "plant created");
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(plant))))
}

/// GET /api/plants?page=
pub async fn list_plants(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ResponseJson<ApiResponse<Page<Plant>>>, ApiError> {
    let total = Plant::count_all(&state.db.pool).await?;
    let paginator = Paginator::new(PLANTS_PER_PAGE, total);
    let page = paginator.resolve(query.page.as_deref());
    let plants =
        Plant::find_page(&state.db.pool, paginator.per_page, paginator.offset(page)).await?;
    Ok(ResponseJson(ApiResponse::success(
        paginator.page_of(plants, page),
    )))
}

/// GET /api/plants/search?q=
pub async fn search_plants(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<Plant>>>, ApiError> {
    let plants = Plant::search_by_name(&state.db.pool, &query.q).await?;
    Ok(ResponseJson(ApiResponse::success(plants)))
}

/// GET /api/plants/{plant_id}
pub async fn get_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Plant>>, ApiError> {
    let plant = Plant::find_by_id(&state.db.pool, plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

/// PUT /api/plants/{plant_id}
pub async fn update_plant(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
    axum::Json(payload): axum::Json<UpdatePlant>,
) -> Result<ResponseJson<ApiResponse<Plant>>, ApiError> {
    validate_plant(&payload)?;
    let plant = Plant::update(&state.db.pool, plant_id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(plant)))
}

/// DELETE /api/plants/{plant_id} — superuser only; cascades to maintenance
/// tasks, plantings and comments.
pub async fn delete_plant(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    user.require_superuser()?;
    let deleted = Plant::delete(&state.db.pool, plant_id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("plant"));
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plants", get(list_plants).post(create_plant))
        .route("/plants/search", get(search_plants))
        .route(
            "/plants/{plant_id}",
            get(get_plant).put(update_plant).delete(delete_plant),
        )
}
