use axum::extract::{Path, State};
use axum::Json;
use contracts::shared::responses::MessageResource;
use contracts::system::profiles::{ProfileResource, ProfileSettingsResource, UpdateProfileDto};

use crate::shared::error::ServiceError;
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::service::authorize;
use crate::system::profiles::service;

/// GET /api/profile/:email
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<ProfileResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    let (user, profile) = service::get_profile(&state.db, &email).await?;
    Ok(Json(ProfileResource::from_parts(&user, &profile)))
}

/// PUT /api/profile/:email
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
    Json(dto): Json<UpdateProfileDto>,
) -> Result<Json<ProfileResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    let (user, profile) = service::update_profile(&state.db, &email, dto).await?;
    Ok(Json(ProfileResource::from_parts(&user, &profile)))
}

/// GET /api/profile/settings/:email
pub async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<ProfileSettingsResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    let profile = service::get_settings(&state.db, &email).await?;
    Ok(Json(ProfileSettingsResource::from(&profile)))
}

/// PUT /api/profile/settings/reset/:email
pub async fn reset_settings(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<MessageResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    service::reset_settings(&state.db, &email).await?;
    Ok(Json(MessageResource::new("Settings reset to defaults")))
}
