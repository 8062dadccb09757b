//! UserRepository - account storage.

use chrono::Utc;
use sqlx::{Error, SqlitePool};

use super::{Create, Read};
use crate::dtos::CreateUserDTO;
use crate::entities::{Role, SubscriptionStatus, User};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, display_name, password, role, subscription, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
    }

    /// Insert an account with an explicit role. `data.password` must
    /// already be hashed; this layer never sees plaintext credentials.
    pub async fn create_with_role(&self, data: &CreateUserDTO, role: Role) -> Result<User, Error> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, display_name, password, role, subscription, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&data.username)
        .bind(&data.display_name)
        .bind(&data.password)
        .bind(role)
        .bind(SubscriptionStatus::None)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        Ok(User {
            user_id: result.last_insert_rowid(),
            username: data.username.clone(),
            display_name: data.display_name.clone(),
            password: data.password.clone(),
            role,
            subscription: SubscriptionStatus::None,
            created_at: now,
        })
    }

    pub async fn admin_exists(&self) -> Result<bool, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }

    /// Move the subscription state of a user, but only out of one of the
    /// `from` states. A single conditional UPDATE, so two racing
    /// transitions cannot both apply; returns whether anything changed.
    pub async fn transition_subscription(
        &self,
        user_id: &i64,
        from: &[SubscriptionStatus],
        to: SubscriptionStatus,
    ) -> Result<bool, Error> {
        // Build the IN list from placeholders; at most four states exist
        let placeholders = vec!["?"; from.len()].join(", ");
        let sql = format!(
            "UPDATE users SET subscription = ? WHERE user_id = ? AND subscription IN ({placeholders})"
        );

        let mut query = sqlx::query(&sql).bind(to).bind(user_id);
        for state in from {
            query = query.bind(state);
        }

        let result = query.execute(&self.connection_pool).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_pending_subscriptions(&self) -> Result<Vec<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, display_name, password, role, subscription, created_at
            FROM users
            WHERE subscription = 'pending'
            ORDER BY username ASC
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// Registration path: every self-created account is a customer.
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        self.create_with_role(data, Role::User).await
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, display_name, password, role, subscription, created_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}
