//! Storefront server library - exposes the modules and the router so the
//! integration tests can drive the full application in-process.

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-exports of the main types to shorten imports
pub use crate::core::{auth, config, AppError, AppState};
pub use crate::services::root;

use axum::{
    middleware,
    routing::{any, delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::core::authentication_middleware;
    use crate::services::*;
    use crate::ws::ws_handler;

    Router::new()
        .route("/", get(root))
        .route("/config", get(client_config))
        .nest("/auth", configure_auth_routes())
        .nest("/products", configure_product_routes(state.clone()))
        .nest("/conversations", configure_conversation_routes(state.clone()))
        .nest("/subscriptions", configure_subscription_routes(state.clone()))
        .route(
            "/ws",
            any(ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                authentication_middleware,
            )),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Authentication routes (login, register) - the only unauthenticated
/// mutations in the API.
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use crate::services::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

/// Catalog routes: public reads, admin-only writes.
fn configure_product_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{admin_only_middleware, authentication_middleware};
    use crate::services::*;

    let public_routes = Router::new()
        .route("/", get(list_products))
        .route("/{product_id}", get(get_product));

    let admin_routes = Router::new()
        .route("/", post(create_product))
        .route("/{product_id}", put(update_product).delete(delete_product))
        .layer(middleware::from_fn(admin_only_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    public_routes.merge(admin_routes)
}

/// Support-chat routes. Appending and reading one's own history need only
/// authentication; the inbox, read-state and deletion surface is admin-only.
fn configure_conversation_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{admin_only_middleware, authentication_middleware};
    use crate::services::*;

    // GET and POST on {key}/messages carry different role rules, so the
    // pair lives behind the auth layer and the handlers enforce the role.
    let shared_routes = Router::new()
        .route("/mine/messages", get(get_my_messages))
        .route(
            "/{key}/messages",
            get(get_conversation_messages).post(post_message),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    let admin_routes = Router::new()
        .route("/", get(list_conversations))
        .route("/{key}/read", post(mark_conversation_read))
        .route("/{key}", delete(delete_conversation))
        .route("/bulk_delete", post(bulk_delete_conversations))
        .layer(middleware::from_fn(admin_only_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    shared_routes.merge(admin_routes)
}

/// Subscription workflow routes.
fn configure_subscription_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{admin_only_middleware, authentication_middleware};
    use crate::services::*;

    let user_routes = Router::new()
        .route("/request", post(request_subscription))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    let admin_routes = Router::new()
        .route("/pending", get(list_pending_subscriptions))
        .route("/{user_id}/approve", post(approve_subscription))
        .route("/{user_id}/reject", post(reject_subscription))
        .layer(middleware::from_fn(admin_only_middleware))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ));

    user_routes.merge(admin_routes)
}
