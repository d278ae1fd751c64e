use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::system::auth::jwt::JwtSettings;

/// Shared by every handler through axum `State`
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: Arc<JwtSettings>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt: JwtSettings) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
        }
    }
}
