use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    comment::{Comment, CommentWithAuthor, CreateComment},
    plant::Plant,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, auth::CurrentUser, error::ApiError};

pub const NO_COMMENTS_MESSAGE: &str = "No comments for this plant yet.";

/// POST /api/plants/{plant_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(plant_id): Path<Uuid>,
    axum::Json(payload): axum::Json<CreateComment>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Comment>>), ApiError> {
    if payload.comment.trim().is_empty() {
        return Err(ApiError::Validation("comment must not be empty".into()));
    }
    Plant::find_by_id(&state.db.pool, plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    let comment = Comment::create(&state.db.pool, plant_id, user.0.id, &payload).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(comment)),
    ))
}

/// GET /api/plants/{plant_id}/comments — public, newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(plant_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<CommentWithAuthor>>>, ApiError> {
    Plant::find_by_id(&state.db.pool, plant_id)
        .await?
        .ok_or(ApiError::NotFound("plant"))?;
    let comments = Comment::find_by_plant_id(&state.db.pool, plant_id).await?;
    let response = if comments.is_empty() {
        ApiResponse::success_with_message(comments, NO_COMMENTS_MESSAGE)
    } else {
        ApiResponse::success(comments)
    };
    Ok(ResponseJson(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/plants/{plant_id}/comments",
        get(list_comments).post(create_comment),
    )
}
