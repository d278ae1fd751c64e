use contracts::domain::common::AggregateRoot;
use contracts::system::profiles::{Profile, UpdateProfileDto};
use contracts::system::users::{User, UserId};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use super::repository;
use crate::shared::error::ServiceResult;
use crate::system::users;

/// Idempotent: returns the existing profile or stores one with defaults
pub async fn get_or_create_for_user<C: ConnectionTrait>(conn: &C, user_id: UserId) -> ServiceResult<Profile> {
    if let Some(profile) = repository::find_by_user_id(conn, user_id).await? {
        return Ok(profile);
    }
    let profile = repository::save(conn, Profile::for_user(user_id)).await?;
    tracing::info!("Profile created for user {}", user_id);
    Ok(profile)
}

/// User plus profile, keyed by email
pub async fn get_profile(db: &DatabaseConnection, email: &str) -> ServiceResult<(User, Profile)> {
    let txn = db.begin().await?;
    let user = users::service::require_by_email(&txn, email).await?;
    let profile = get_or_create_for_user(&txn, user.id).await?;
    txn.commit().await?;
    Ok((user, profile))
}

/// Partial update: only the provided settings change
pub async fn update_profile(
    db: &DatabaseConnection,
    email: &str,
    dto: UpdateProfileDto,
) -> ServiceResult<(User, Profile)> {
    let changes = dto.validate()?;

    let txn = db.begin().await?;
    let user = users::service::require_by_email(&txn, email).await?;
    let mut profile = get_or_create_for_user(&txn, user.id).await?;
    profile.apply(changes);
    profile.before_write();
    let saved = repository::save(&txn, profile).await?;
    txn.commit().await?;

    Ok((user, saved))
}

pub async fn get_settings(db: &DatabaseConnection, email: &str) -> ServiceResult<Profile> {
    let (_, profile) = get_profile(db, email).await?;
    Ok(profile)
}

/// Language, notifications and alerts back to defaults
pub async fn reset_settings(db: &DatabaseConnection, email: &str) -> ServiceResult<Profile> {
    let txn = db.begin().await?;
    let user = users::service::require_by_email(&txn, email).await?;
    let mut profile = get_or_create_for_user(&txn, user.id).await?;
    profile.reset_settings();
    profile.before_write();
    let saved = repository::save(&txn, profile).await?;
    txn.commit().await?;

    tracing::info!("Settings reset for {}", email);
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use crate::shared::error::ServiceError;
    use crate::system::users::service::tests::insert_user;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let db = connect_in_memory().await.unwrap();
        let user = insert_user(&db, "ana@agro.pe", "11111111").await;

        let first = get_or_create_for_user(&db, user.id).await.unwrap();
        let second = get_or_create_for_user(&db, user.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.language, "es");
        assert!(first.notifications_enabled && first.alerts_enabled);
        assert!(first.avatar_url.is_none());
    }

    #[tokio::test]
    async fn update_then_reset_keeps_avatar() {
        let db = connect_in_memory().await.unwrap();
        insert_user(&db, "ana@agro.pe", "11111111").await;

        let (_, updated) = update_profile(
            &db,
            "ana@agro.pe",
            UpdateProfileDto {
                avatar_url: Some("https://cdn/ana.png".into()),
                language: Some("en".into()),
                notifications_enabled: Some(false),
                alerts_enabled: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.language, "en");
        assert!(!updated.notifications_enabled);
        assert!(updated.alerts_enabled);

        let reset = reset_settings(&db, "ana@agro.pe").await.unwrap();
        assert_eq!(reset.language, "es");
        assert!(reset.notifications_enabled);
        assert_eq!(reset.avatar_url.as_deref(), Some("https://cdn/ana.png"));
        assert_eq!(reset.metadata.version, updated.metadata.version + 1);
    }

    #[tokio::test]
    async fn unknown_email_is_not_found() {
        let db = connect_in_memory().await.unwrap();
        let err = get_settings(&db, "ghost@agro.pe").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
