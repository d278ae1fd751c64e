use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use super::handlers;
use crate::state::AppState;
use crate::system::auth;

/// Конфигурация системных роутов приложения
pub fn configure_system_routes(state: AppState) -> Router<AppState> {
    // ========================================
    // PROFILE / USER ROUTES (bearer token)
    // ========================================
    let protected = Router::new()
        .route("/api/profile/auth/me", get(handlers::auth::me))
        .route(
            "/api/profile/user/:email",
            get(handlers::users::get_by_email)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/api/profile/settings/:email",
            get(handlers::profiles::get_settings),
        )
        .route(
            "/api/profile/settings/reset/:email",
            put(handlers::profiles::reset_settings),
        )
        .route(
            "/api/profile/:email",
            get(handlers::profiles::get_profile).put(handlers::profiles::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::middleware::require_auth,
        ));

    Router::new()
        // ========================================
        // HEALTH CHECK
        // ========================================
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/profile/auth/signup", post(handlers::auth::signup))
        .route("/api/profile/auth/login", post(handlers::auth::login))
        .merge(protected)
}
