use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront::core::{AppState, Config};
use storefront::create_router;
use storefront::dtos::CreateUserDTO;
use storefront::entities::{Role, User};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    config.print_info();

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = Arc::new(AppState::new(
        pool,
        config.jwt_secret.clone(),
        config.inbox_refresh_secs,
    ));

    bootstrap_admin(&state, &config).await?;

    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seed the back-office account on first start. Skipped as soon as any
/// admin exists, so rotating credentials never spawns a second one.
async fn bootstrap_admin(
    state: &AppState,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if state.user.admin_exists().await? {
        return Ok(());
    }

    let password_hash = User::hash_password(&config.bootstrap_admin_password)?;
    let admin = CreateUserDTO {
        username: config.bootstrap_admin_username.clone(),
        display_name: "Support".to_string(),
        password: password_hash,
    };
    let created = state.user.create_with_role(&admin, Role::Admin).await?;

    warn!(
        user_id = created.user_id,
        username = %created.username,
        "Bootstrap admin account created, change its password"
    );
    Ok(())
}
