use axum::extract::State;
use axum::Json;
use contracts::system::auth::{AuthResponse, LoginRequest};
use contracts::system::users::{SignupRequest, UserResource};

use crate::shared::error::ServiceError;
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::service;

/// POST /api/profile/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    Ok(Json(service::signup(&state.db, &state.jwt, request).await?))
}

/// POST /api/profile/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    Ok(Json(service::login(&state.db, &state.jwt, request).await?))
}

/// GET /api/profile/auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserResource>, ServiceError> {
    let user = service::me(&state.db, &claims).await?;
    Ok(Json(UserResource::from(&user)))
}
