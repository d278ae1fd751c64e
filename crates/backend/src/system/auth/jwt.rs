use anyhow::{Context, Result};
use chrono::Utc;
use contracts::domain::common::AggregateId;
use contracts::system::auth::TokenClaims;
use contracts::system::users::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

const JWT_SECRET_KEY: &str = "jwt_secret";

/// Signing key and token lifetime, resolved once at startup
#[derive(Clone)]
pub struct JwtSettings {
    secret: String,
    lifetime_hours: i64,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("lifetime_hours", &self.lifetime_hours)
            .finish_non_exhaustive()
    }
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>, lifetime_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime_hours,
        }
    }

    /// Generate HS256 access token for the user
    pub fn generate_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let exp = (now + chrono::Duration::hours(self.lifetime_hours)).timestamp() as usize;
        let iat = now.timestamp() as usize;

        let claims = TokenClaims {
            sub: user.id.value(),
            email: user.email.clone(),
            role: user.role,
            exp,
            iat,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to encode JWT token")
    }

    /// Validate JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Failed to decode JWT token")?;

        Ok(token_data.claims)
    }
}

/// Secret from config, else from `sys_settings`, else a new one saved there
pub async fn resolve_secret<C: ConnectionTrait>(conn: &C, configured: Option<&str>) -> Result<String> {
    if let Some(secret) = configured.filter(|s| !s.trim().is_empty()) {
        return Ok(secret.to_string());
    }

    if let Some(secret) = get_jwt_secret_from_db(conn).await? {
        return Ok(secret);
    }

    let secret = generate_jwt_secret();
    save_jwt_secret_to_db(conn, &secret).await?;
    tracing::info!("Generated new JWT secret");
    Ok(secret)
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    general_purpose::STANDARD.encode(random_bytes)
}

async fn get_jwt_secret_from_db<C: ConnectionTrait>(conn: &C) -> Result<Option<String>> {
    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [JWT_SECRET_KEY.into()],
        ))
        .await?;

    match result {
        Some(row) => {
            let secret: String = row.try_get("", "value")?;
            Ok(Some(secret))
        }
        None => Ok(None),
    }
}

async fn save_jwt_secret_to_db<C: ConnectionTrait>(conn: &C, secret: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            JWT_SECRET_KEY.into(),
            secret.to_string().into(),
            "Auto-generated JWT secret for authentication".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .context("Failed to store JWT secret")?;

    Ok(())
}
