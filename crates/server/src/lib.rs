use axum::Router;
use db::DBService;
use services::services::auth::AuthService;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub auth: AuthService,
}

/// Assembles the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
