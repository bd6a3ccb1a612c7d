use axum::Router;

use crate::AppState;

pub mod auth;
pub mod comments;
pub mod gardens;
pub mod maintenance;
pub mod monthly_tasks;
pub mod plantings;
pub mod plants;
pub mod schedules;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(plants::router())
        .merge(maintenance::router())
        .merge(gardens::router())
        .merge(plantings::router())
        .merge(monthly_tasks::router())
        .merge(schedules::router())
        .merge(comments::router())
}
