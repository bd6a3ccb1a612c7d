use anyhow::Context;
use db::{
    DBService,
    models::user::{CreateUser, User},
};
use server::{AppState, app};
use services::services::{auth::AuthService, config::Config};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Creates the initial superuser account on a fresh database when the admin
/// credentials are configured.
async fn bootstrap_admin(db: &DBService, config: &Config) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Ok(());
    };
    if User::count(&db.pool).await? > 0 {
        return Ok(());
    }
    let admin = User::create(
        &db.pool,
        &CreateUser {
            username: username.clone(),
            password_hash: AuthService::hash_password(password),
            is_superuser: true,
        },
    )
    .await?;
    tracing::info!(username = %admin.username, "created initial admin user");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let db = DBService::new(&config.database_url)
        .await
        .context("failed to open database")?;
    bootstrap_admin(&db, &config).await?;

    let auth = AuthService::new(config.session_secret.as_bytes(), config.session_ttl_hours);
    let state = AppState { db, auth };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
