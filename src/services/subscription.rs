//! Subscription services - the request/approve/reject workflow.
//!
//! The state lives on the user row and moves through exactly two guarded
//! transitions: the customer requests, an admin resolves. Each transition
//! is one conditional UPDATE, so racing calls cannot double-apply.

use crate::core::{AppError, AppState};
use crate::dtos::UserDTO;
use crate::entities::{SubscriptionStatus, User};
use crate::repositories::Read;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    Extension,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Customer asks for a subscription: `none`/`rejected` become `pending`.
#[instrument(skip(state, current_user), fields(user_id = current_user.user_id))]
pub async fn request_subscription(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<StatusCode, AppError> {
    let moved = state
        .user
        .transition_subscription(
            &current_user.user_id,
            &[SubscriptionStatus::None, SubscriptionStatus::Rejected],
            SubscriptionStatus::Pending,
        )
        .await?;

    if !moved {
        return Err(AppError::conflict("A subscription is already pending or active"));
    }

    info!("Subscription requested");
    Ok(StatusCode::ACCEPTED)
}

/// Admin view of all accounts waiting for a decision.
#[instrument(skip(state))]
pub async fn list_pending_subscriptions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    let users = state.user.find_pending_subscriptions().await?;
    Ok(Json(users.into_iter().map(UserDTO::from).collect()))
}

#[instrument(skip(state), fields(user_id))]
pub async fn approve_subscription(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    resolve_subscription(&state, &user_id, SubscriptionStatus::Active).await
}

#[instrument(skip(state), fields(user_id))]
pub async fn reject_subscription(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    resolve_subscription(&state, &user_id, SubscriptionStatus::Rejected).await
}

async fn resolve_subscription(
    state: &AppState,
    user_id: &i64,
    outcome: SubscriptionStatus,
) -> Result<StatusCode, AppError> {
    if state.user.read(user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    let moved = state
        .user
        .transition_subscription(user_id, &[SubscriptionStatus::Pending], outcome)
        .await?;

    if !moved {
        return Err(AppError::conflict("No pending subscription request for this user"));
    }

    info!(user_id, ?outcome, "Subscription resolved");
    Ok(StatusCode::NO_CONTENT)
}
