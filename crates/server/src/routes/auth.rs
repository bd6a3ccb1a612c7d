use axum::{
    Router,
    extract::State,
    http::header::{self, HeaderName},
    response::{AppendHeaders, Json as ResponseJson},
    routing::{get, post},
};
use db::models::user::User;
use serde::{Deserialize, Serialize};
use services::services::auth::{AuthError, AuthService};
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, auth::{CurrentUser, SESSION_COOKIE}, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

type SetCookie = AppendHeaders<[(HeaderName, String); 1]>;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<LoginRequest>,
) -> Result<(SetCookie, ResponseJson<ApiResponse<LoginResponse>>), ApiError> {
    let user = User::find_by_username(&state.db.pool, &payload.username)
        .await?
        .ok_or(ApiError::Auth(AuthError::InvalidCredentials))?;
    if !AuthService::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Auth(AuthError::InvalidCredentials));
    }

    let token = state.auth.issue_token(user.id)?;
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.auth.ttl_seconds()
    );
    tracing::info!(username = %user.username, "user logged in");
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        ResponseJson(ApiResponse::success(LoginResponse { token, user })),
    ))
}

/// POST /api/auth/logout
pub async fn logout() -> (SetCookie, ResponseJson<ApiResponse<()>>) {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        ResponseJson(ApiResponse::success(())),
    )
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> ResponseJson<ApiResponse<User>> {
    ResponseJson(ApiResponse::success(user.0))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/me", get(me)),
    )
}
