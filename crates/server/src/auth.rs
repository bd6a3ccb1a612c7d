//! Request authentication: the session token is accepted either from the
//! `garden_session` cookie or an `Authorization: Bearer` header.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use db::models::user::User;

use crate::{AppState, error::ApiError};

pub const SESSION_COOKIE: &str = "garden_session";

/// The logged-in user. Extraction fails with 401 when no valid session is
/// presented.
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// 403 unless the user is a superuser.
    pub fn require_superuser(&self) -> Result<(), ApiError> {
        if self.0.is_superuser {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn cookie_token(parts: &Parts) -> Option<&str> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(ApiError::Unauthorized)?
            .to_owned();
        let user_id = state.auth.verify_token(&token)?;
        let user = User::find_by_id(&state.db.pool, user_id)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        Ok(CurrentUser(user))
    }
}
