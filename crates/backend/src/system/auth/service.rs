use contracts::system::auth::{AuthResponse, LoginRequest, TokenClaims};
use contracts::system::users::{SignupRequest, User, UserId, UserResource};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::jwt::JwtSettings;
use super::password;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::{profiles, users};

fn auth_response(jwt: &JwtSettings, user: &User) -> ServiceResult<AuthResponse> {
    Ok(AuthResponse {
        token: jwt.generate_token(user)?,
        user: UserResource::from(user),
    })
}

/// Register a user, create its profile and sign a token
pub async fn signup(
    db: &DatabaseConnection,
    jwt: &JwtSettings,
    request: SignupRequest,
) -> ServiceResult<AuthResponse> {
    let data = request.validate()?;

    let txn = db.begin().await?;
    if users::repository::exists_by_email(&txn, &data.email).await? {
        return Err(ServiceError::conflict("email", "Email is already registered"));
    }
    if users::repository::exists_by_dni(&txn, &data.dni).await? {
        return Err(ServiceError::conflict("dni", "DNI is already registered"));
    }
    let user = users::service::insert_new(&txn, data).await?;
    profiles::service::get_or_create_for_user(&txn, user.id).await?;
    txn.commit().await?;

    tracing::info!("User {} signed up as {}", user.id, user.role);
    auth_response(jwt, &user)
}

/// Unknown email and wrong password fail the same way
pub async fn login(
    db: &DatabaseConnection,
    jwt: &JwtSettings,
    request: LoginRequest,
) -> ServiceResult<AuthResponse> {
    let Some(user) = users::repository::find_by_email(db, &request.email).await? else {
        password::verify_dummy(&request.password);
        tracing::warn!("Login failed for unknown email");
        return Err(ServiceError::InvalidCredentials);
    };

    if !password::verify_password(&request.password, &user.password_hash)? {
        tracing::warn!("Login failed for user {}", user.id);
        return Err(ServiceError::InvalidCredentials);
    }

    auth_response(jwt, &user)
}

/// The user behind a validated token
pub async fn me(db: &DatabaseConnection, claims: &TokenClaims) -> ServiceResult<User> {
    users::repository::find_by_id(db, UserId(claims.sub))
        .await?
        .ok_or_else(|| ServiceError::NotFound("User".to_string()))
}

/// Email-keyed resources are open to the account currently holding the
/// email, or to an administrator. The caller is looked up by token subject,
/// so a token of a renamed or deleted account grants nothing.
pub async fn authorize(db: &DatabaseConnection, claims: &TokenClaims, email: &str) -> ServiceResult<()> {
    let Some(caller) = users::repository::find_by_id(db, UserId(claims.sub)).await? else {
        tracing::warn!("Token subject {} no longer exists", claims.sub);
        return Err(ServiceError::Forbidden);
    };
    if caller.is_admin() {
        return Ok(());
    }

    let owner = users::repository::find_by_email(db, email).await?;
    if owner.is_some_and(|owner| owner.id == caller.id) {
        return Ok(());
    }

    tracing::warn!("User {} denied access to {}", caller.id, email);
    Err(ServiceError::Forbidden)
}
