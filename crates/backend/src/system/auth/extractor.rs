use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;

/// Verified token of the caller. Only available behind `require_auth`,
/// which validates the bearer token and stores its claims.
///
/// ```ignore
/// pub async fn me(
///     State(state): State<AppState>,
///     CurrentUser(claims): CurrentUser,
/// ) -> Result<Json<UserResource>, ServiceError>
/// ```
///
/// Ownership of email-keyed resources is decided by
/// `system::auth::service::authorize`, not by the claims alone.
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TokenClaims>() {
            Some(claims) => Ok(CurrentUser(claims.clone())),
            None => {
                tracing::warn!("No token claims on {}; route is missing require_auth", parts.uri.path());
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}
