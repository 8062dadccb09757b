#![allow(dead_code)]

use axum_test::TestServer;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use storefront::core::AppState;
use storefront::dtos::CreateUserDTO;
use storefront::entities::{Role, User};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const INBOX_REFRESH_SECS: u64 = 15;

/// Fresh in-memory database with migrations applied. One connection keeps
/// every query on the same in-memory instance.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(
        pool,
        JWT_SECRET.to_string(),
        INBOX_REFRESH_SECS,
    ))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = storefront::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Seed an account directly through the repository. The stored password is
/// not a usable hash; login-path tests call `seed_user_with_password`.
pub async fn seed_user(state: &AppState, username: &str, display_name: &str, role: Role) -> User {
    let dto = CreateUserDTO {
        username: username.to_string(),
        display_name: display_name.to_string(),
        password: "$2b$not-a-real-hash".to_string(),
    };
    state
        .user
        .create_with_role(&dto, role)
        .await
        .expect("Failed to seed user")
}

/// Seed an account whose password survives bcrypt verification.
pub async fn seed_user_with_password(
    state: &AppState,
    username: &str,
    display_name: &str,
    role: Role,
    password: &str,
) -> User {
    let hash = User::hash_password(password).expect("Failed to hash password");
    let dto = CreateUserDTO {
        username: username.to_string(),
        display_name: display_name.to_string(),
        password: hash,
    };
    state
        .user
        .create_with_role(&dto, role)
        .await
        .expect("Failed to seed user")
}

/// Mint a JWT valid for 24 hours, the way the login endpoint does.
pub fn create_test_jwt(user_id: i64, username: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: i64,
        username: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: user_id,
        username: username.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create JWT token")
}
