use contracts::domain::common::AggregateRoot;
use contracts::system::users::{NewUser, Role, UpdateUserDto, User};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::repository;
use crate::shared::config::AuthConfig;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::auth::password;
use crate::system::profiles;

/// Load by email or fail with `NotFound`
pub async fn require_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> ServiceResult<User> {
    repository::find_by_email(conn, email)
        .await?
        .ok_or_else(|| ServiceError::NotFound(User::element_name().to_string()))
}

pub async fn get_by_email(db: &DatabaseConnection, email: &str) -> ServiceResult<User> {
    require_by_email(db, email).await
}

/// Hash the password and insert; uniqueness is checked by the caller
pub async fn insert_new<C: ConnectionTrait>(conn: &C, data: NewUser) -> ServiceResult<User> {
    let password_hash = password::hash_password(&data.password)?;
    repository::save(conn, User::new(data, password_hash)).await
}

/// Partial update by email; changed email or dni must stay unique
pub async fn update(db: &DatabaseConnection, email: &str, dto: UpdateUserDto) -> ServiceResult<User> {
    let changes = dto.validate()?;

    let txn = db.begin().await?;
    let mut user = require_by_email(&txn, email).await?;

    if let Some(new_email) = changes.email {
        if new_email != user.email {
            if repository::exists_by_email(&txn, &new_email).await? {
                return Err(ServiceError::conflict("email", "Email is already registered"));
            }
            user.email = new_email;
        }
    }
    if let Some(new_dni) = changes.dni {
        if new_dni != user.dni {
            if repository::exists_by_dni(&txn, &new_dni).await? {
                return Err(ServiceError::conflict("dni", "DNI is already registered"));
            }
            user.dni = new_dni;
        }
    }
    if let Some(first_name) = changes.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = changes.last_name {
        user.last_name = last_name;
    }
    if let Some(new_password) = changes.new_password {
        user.password_hash = password::hash_password(&new_password)?;
    }

    user.before_write();
    let saved = repository::save(&txn, user).await?;
    txn.commit().await?;

    tracing::info!("User {} updated", saved.id);
    Ok(saved)
}

/// Removes the user and its profile
pub async fn delete(db: &DatabaseConnection, email: &str) -> ServiceResult<()> {
    let txn = db.begin().await?;
    let user = require_by_email(&txn, email).await?;
    profiles::repository::delete_by_user_id(&txn, user.id).await?;
    repository::delete_by_id(&txn, user.id).await?;
    txn.commit().await?;

    tracing::info!("User {} deleted", user.id);
    Ok(())
}

/// Create the configured administrator when no user exists yet
pub async fn ensure_bootstrap_admin(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        auth.bootstrap_admin_email.as_deref(),
        auth.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if repository::count(db).await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating bootstrap admin {}", email);
    let txn = db.begin().await?;
    let admin = insert_new(
        &txn,
        NewUser {
            first_name: "Admin".to_string(),
            last_name: "Admin".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            dni: "00000000".to_string(),
            role: Role::Admin,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!("bootstrap admin: {}", e))?;
    profiles::service::get_or_create_for_user(&txn, admin.id)
        .await
        .map_err(|e| anyhow::anyhow!("bootstrap admin profile: {}", e))?;
    txn.commit().await?;

    tracing::warn!("Bootstrap admin {} created, change its password", email);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    pub(crate) async fn insert_user(db: &DatabaseConnection, email: &str, dni: &str) -> User {
        insert_new(
            db,
            NewUser {
                first_name: "Ana".into(),
                last_name: "Quispe".into(),
                email: email.into(),
                password: "secret1".into(),
                dni: dni.into(),
                role: Role::Farmer,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn partial_update_changes_only_given_fields() {
        let db = connect_in_memory().await.unwrap();
        let original = insert_user(&db, "ana@agro.pe", "11111111").await;

        let updated = update(
            &db,
            "ana@agro.pe",
            UpdateUserDto {
                last_name: Some("Mamani".into()),
                new_password: Some("".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.last_name, "Mamani");
        assert_eq!(updated.first_name, original.first_name);
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.password_hash, original.password_hash);
        assert_eq!(updated.metadata.version, 1);
    }

    #[tokio::test]
    async fn email_change_must_stay_unique() {
        let db = connect_in_memory().await.unwrap();
        insert_user(&db, "ana@agro.pe", "11111111").await;
        insert_user(&db, "luis@agro.pe", "22222222").await;

        let err = update(
            &db,
            "luis@agro.pe",
            UpdateUserDto {
                email: Some("ana@agro.pe".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict { ref field, .. } if field == "email"));

        // unchanged dni is not a conflict with itself
        update(
            &db,
            "luis@agro.pe",
            UpdateUserDto {
                dni: Some("22222222".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn new_password_is_rehashed() {
        let db = connect_in_memory().await.unwrap();
        insert_user(&db, "ana@agro.pe", "11111111").await;
        let updated = update(
            &db,
            "ana@agro.pe",
            UpdateUserDto {
                new_password: Some("another1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(password::verify_password("another1", &updated.password_hash).unwrap());
        assert!(!password::verify_password("secret1", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn delete_removes_profile_too() {
        let db = connect_in_memory().await.unwrap();
        let user = insert_user(&db, "ana@agro.pe", "11111111").await;
        profiles::service::get_or_create_for_user(&db, user.id).await.unwrap();

        delete(&db, "ana@agro.pe").await.unwrap();
        assert!(repository::find_by_id(&db, user.id).await.unwrap().is_none());
        assert!(profiles::repository::find_by_user_id(&db, user.id)
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            delete(&db, "ana@agro.pe").await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn bootstrap_admin_only_when_configured_and_empty() {
        let db = connect_in_memory().await.unwrap();
        ensure_bootstrap_admin(&db, &AuthConfig::default()).await.unwrap();
        assert_eq!(repository::count(&db).await.unwrap(), 0);

        let auth = AuthConfig {
            bootstrap_admin_email: Some("admin@agro.local".into()),
            bootstrap_admin_password: Some("admin123".into()),
            ..AuthConfig::default()
        };
        ensure_bootstrap_admin(&db, &auth).await.unwrap();
        ensure_bootstrap_admin(&db, &auth).await.unwrap();
        assert_eq!(repository::count(&db).await.unwrap(), 1);

        let admin = get_by_email(&db, "admin@agro.local").await.unwrap();
        assert!(admin.is_admin());
    }
}
