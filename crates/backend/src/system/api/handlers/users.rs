use axum::extract::{Path, State};
use axum::Json;
use contracts::shared::responses::MessageResource;
use contracts::system::users::{UpdateUserDto, UserResource};

use crate::shared::error::ServiceError;
use crate::state::AppState;
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::service::authorize;
use crate::system::users::service;

/// GET /api/profile/user/:email
pub async fn get_by_email(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<UserResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    let user = service::get_by_email(&state.db, &email).await?;
    Ok(Json(UserResource::from(&user)))
}

/// PUT /api/profile/user/:email
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
    Json(dto): Json<UpdateUserDto>,
) -> Result<Json<UserResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    let user = service::update(&state.db, &email, dto).await?;
    Ok(Json(UserResource::from(&user)))
}

/// DELETE /api/profile/user/:email
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<MessageResource>, ServiceError> {
    authorize(&state.db, &claims, &email).await?;
    service::delete(&state.db, &email).await?;
    Ok(Json(MessageResource::new("User deleted successfully")))
}
