use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use crate::shared::validation::{ValidationErrors, Validator};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 120;
pub const DNI_MAX_LEN: usize = 15;
pub const PASSWORD_MIN_LEN: usize = 6;

crate::aggregate_id!(
    /// Уникальный идентификатор пользователя
    UserId
);

// ============================================================================
// Role
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Farmer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Farmer => "FARMER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Case-insensitive: "admin", "Farmer", "FARMER" are all accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "FARMER" => Ok(Role::Farmer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Registered account. `password_hash` is an argon2 PHC string.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub dni: String,
    pub role: Role,
    pub metadata: EntityMetadata,
}

impl User {
    pub fn new(data: NewUser, password_hash: String) -> Self {
        Self {
            id: UserId::unassigned(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            password_hash,
            dni: data.dni,
            role: data.role,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "sys"
    }

    fn collection_name() -> &'static str {
        "users"
    }

    fn element_name() -> &'static str {
        "User"
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Validated signup data; the plain password is hashed by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub dni: String,
    pub role: Role,
}

fn check_email(v: &mut Validator, email: &str) {
    if !email.is_empty() {
        v.check(email.contains('@'), "email", "Email must be a valid address");
    }
}

fn check_password(v: &mut Validator, field: &str, password: &str) {
    v.check(
        password.chars().count() >= PASSWORD_MIN_LEN,
        field,
        format!("Password must be at least {} characters", PASSWORD_MIN_LEN),
    );
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(alias = "nombre")]
    pub first_name: Option<String>,
    #[serde(alias = "apellido")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dni: Option<String>,
    /// Only "FARMER" (or omitted) is accepted
    #[serde(alias = "rol")]
    pub role: Option<String>,
}

impl SignupRequest {
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let mut v = Validator::new();
        let first_name = v.required_text("firstName", "First name", self.first_name, NAME_MAX_LEN);
        let last_name = v.required_text("lastName", "Last name", self.last_name, NAME_MAX_LEN);
        let email = v.required_text("email", "Email", self.email, EMAIL_MAX_LEN);
        check_email(&mut v, &email);
        let password = match self.password {
            Some(p) if !p.is_empty() => {
                check_password(&mut v, "password", &p);
                p
            }
            _ => {
                v.push("password", "Password is required");
                String::new()
            }
        };
        let dni = v.required_text("dni", "DNI", self.dni, DNI_MAX_LEN);
        // public signup only creates farmers
        let role = Role::Farmer;
        match self.role.as_deref().map(str::trim) {
            None | Some("") => {}
            Some(raw) => match raw.parse::<Role>() {
                Ok(Role::Farmer) => {}
                Ok(Role::Admin) => v.push("role", "ADMIN accounts cannot be created by signup"),
                Err(_) => v.push("role", "Role must be ADMIN or FARMER"),
            },
        }
        v.finish()?;
        Ok(NewUser {
            first_name,
            last_name,
            email,
            password,
            dni,
            role,
        })
    }
}

/// Partial update of an account; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[serde(alias = "nombre")]
    pub first_name: Option<String>,
    #[serde(alias = "apellido")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dni: Option<String>,
    /// Ignored when blank
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dni: Option<String>,
    pub new_password: Option<String>,
}

impl UpdateUserDto {
    pub fn validate(self) -> Result<UserChanges, ValidationErrors> {
        let mut v = Validator::new();
        let mut present = |field: &str, label: &str, value: Option<String>, max: usize| {
            value.map(|s| v.required_text(field, label, Some(s), max))
        };
        let first_name = present("firstName", "First name", self.first_name, NAME_MAX_LEN);
        let last_name = present("lastName", "Last name", self.last_name, NAME_MAX_LEN);
        let email = present("email", "Email", self.email, EMAIL_MAX_LEN);
        let dni = present("dni", "DNI", self.dni, DNI_MAX_LEN);
        if let Some(email) = &email {
            check_email(&mut v, email);
        }
        let new_password = self.new_password.filter(|p| !p.trim().is_empty());
        if let Some(p) = &new_password {
            check_password(&mut v, "newPassword", p);
        }
        v.finish()?;
        Ok(UserChanges {
            first_name,
            last_name,
            email,
            dni,
            new_password,
        })
    }
}

// ============================================================================
// Resource
// ============================================================================

/// Public projection of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dni: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<&User> for UserResource {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.value(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            dni: user.dni.clone(),
            role: user.role,
            created_at: user.metadata.created_at,
            updated_at: user.metadata.updated_at,
            version: user.metadata.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupRequest {
        SignupRequest {
            first_name: Some("Ana".into()),
            last_name: Some("Quispe".into()),
            email: Some("ana@agro.pe".into()),
            password: Some("secret1".into()),
            dni: Some("12345678".into()),
            role: Some("farmer".into()),
        }
    }

    #[test]
    fn role_parsing_ignores_case() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("Farmer".parse::<Role>(), Ok(Role::Farmer));
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
    }

    #[test]
    fn signup_accepts_legacy_field_names() {
        let json = r#"{"nombre":"Ana","apellido":"Quispe","email":"ana@agro.pe",
            "password":"secret1","dni":"12345678","rol":"farmer"}"#;
        let req: SignupRequest = serde_json::from_str(json).unwrap();
        let user = req.validate().unwrap();
        assert_eq!(user.first_name, "Ana");
        assert_eq!(user.role, Role::Farmer);
    }

    #[test]
    fn signup_cannot_request_admin() {
        for raw in ["ADMIN", "admin", " Admin "] {
            let mut req = signup();
            req.role = Some(raw.into());
            let errors = req.validate().unwrap_err();
            assert_eq!(
                errors.message_for("role"),
                Some("ADMIN accounts cannot be created by signup")
            );
        }
    }

    #[test]
    fn signup_rejects_short_password_and_bad_email() {
        let mut req = signup();
        req.password = Some("123".into());
        req.email = Some("not-an-email".into());
        req.role = Some("boss".into());
        let errors = req.validate().unwrap_err();
        assert!(errors.has_field("password"));
        assert_eq!(
            errors.message_for("email"),
            Some("Email must be a valid address")
        );
        assert!(errors.has_field("role"));
    }

    #[test]
    fn role_defaults_to_farmer() {
        let mut req = signup();
        req.role = None;
        assert_eq!(req.validate().unwrap().role, Role::Farmer);
    }

    #[test]
    fn blank_new_password_is_ignored() {
        let dto = UpdateUserDto {
            first_name: Some("Ana María".into()),
            new_password: Some("   ".into()),
            ..Default::default()
        };
        let changes = dto.validate().unwrap();
        assert_eq!(changes.first_name.as_deref(), Some("Ana María"));
        assert_eq!(changes.new_password, None);
        assert_eq!(changes.email, None);
    }

    #[test]
    fn resource_has_no_password() {
        let user = User::new(signup().validate().unwrap(), "$argon2id$...".into());
        let json = serde_json::to_value(UserResource::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "FARMER");
    }
}
