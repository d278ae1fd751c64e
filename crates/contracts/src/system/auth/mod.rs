use serde::{Deserialize, Serialize};

use super::users::{Role, UserResource};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResource,
}

/// Signed into every token. Access decisions re-read the user by `sub`;
/// `email` and `role` describe the account at issue time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: i64, // user_id
    pub email: String,
    pub role: Role,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}
