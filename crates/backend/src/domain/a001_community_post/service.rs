use contracts::domain::a001_community_post::aggregate::{
    CommunityPost, CommunityPostId, CreateCommunityPostDto, UpdateCommunityPostDto,
};
use contracts::domain::common::AggregateRoot;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};

/// Which subset of posts to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    User(String),
    DescriptionContaining(String),
}

/// Создание новой публикации
pub async fn create(db: &DatabaseConnection, dto: CreateCommunityPostDto) -> ServiceResult<CommunityPost> {
    let data = dto.validate()?;
    let post = CommunityPost::new(data);

    let txn = db.begin().await?;
    let saved = repository::save(&txn, post).await?;
    txn.commit().await?;

    tracing::info!("Community post {} created by {}", saved.id, saved.user);
    Ok(saved)
}

pub async fn get_by_id(db: &DatabaseConnection, id: CommunityPostId) -> ServiceResult<Option<CommunityPost>> {
    Ok(repository::find_by_id(db, id).await?)
}

pub async fn list(db: &DatabaseConnection, filter: PostFilter) -> ServiceResult<Vec<CommunityPost>> {
    let posts = match filter {
        PostFilter::All => repository::find_all(db).await?,
        PostFilter::User(user) => repository::find_by_user(db, &user).await?,
        PostFilter::DescriptionContaining(keyword) => {
            repository::find_by_description_containing(db, &keyword).await?
        }
    };
    Ok(posts)
}

/// Replace the description; `None` when the post does not exist
pub async fn update(
    db: &DatabaseConnection,
    id: CommunityPostId,
    dto: UpdateCommunityPostDto,
) -> ServiceResult<Option<CommunityPost>> {
    let cmd = dto.validate()?;

    let txn = db.begin().await?;
    let Some(mut post) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    ServiceError::check_version(cmd.expected_version, post.metadata.version)?;

    post.update_description(cmd.data);
    post.before_write();
    let saved = repository::save(&txn, post).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

pub async fn delete(db: &DatabaseConnection, id: CommunityPostId) -> ServiceResult<bool> {
    let txn = db.begin().await?;
    if !repository::exists_by_id(&txn, id).await? {
        return Ok(false);
    }
    repository::delete_by_id(&txn, id).await?;
    txn.commit().await?;

    tracing::info!("Community post {} deleted", id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_community_post::aggregate::CommunityPostResource;
    use crate::shared::data::db::connect_in_memory;

    fn post(user: &str, description: &str) -> CreateCommunityPostDto {
        CreateCommunityPostDto {
            user: Some(user.into()),
            description: Some(description.into()),
        }
    }

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let db = connect_in_memory().await.unwrap();
        let created = create(&db, post("Ana", "Riego por goteo")).await.unwrap();
        assert_eq!(created.id, CommunityPostId(1));

        let found = get_by_id(&db, created.id).await.unwrap().unwrap();
        let resource = CommunityPostResource::from(&found);
        assert_eq!(resource.id, 1);
        assert_eq!(resource.user, "Ana");
        assert_eq!(resource.description, "Riego por goteo");
        assert_eq!(resource.version, 0);
        assert_eq!(resource.created_at, resource.updated_at);
        assert_eq!(resource, CommunityPostResource::from(&created));
    }

    #[tokio::test]
    async fn blank_description_is_rejected() {
        let db = connect_in_memory().await.unwrap();
        let err = create(&db, post("Ana", "  ")).await.unwrap_err();
        match err {
            ServiceError::Validation(e) => assert!(e.has_field("description")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(list(&db, PostFilter::All).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn filters_by_user_and_keyword() {
        let db = connect_in_memory().await.unwrap();
        create(&db, post("Ana", "Tips for Wheat")).await.unwrap();
        create(&db, post("Luis", "wheat prices")).await.unwrap();
        create(&db, post("Ana", "Corn 100%")).await.unwrap();

        let by_ana = list(&db, PostFilter::User("Ana".into())).await.unwrap();
        assert_eq!(by_ana.len(), 2);
        assert!(by_ana[0].id < by_ana[1].id);

        // case-sensitive
        let wheat = list(&db, PostFilter::DescriptionContaining("Wheat".into()))
            .await
            .unwrap();
        assert_eq!(wheat.len(), 1);
        assert_eq!(wheat[0].user, "Ana");

        // wildcard characters are literal
        let percent = list(&db, PostFilter::DescriptionContaining("%".into()))
            .await
            .unwrap();
        assert_eq!(percent.len(), 1);
    }

    #[tokio::test]
    async fn update_bumps_version_and_rejects_stale() {
        let db = connect_in_memory().await.unwrap();
        let created = create(&db, post("Ana", "v0")).await.unwrap();

        let updated = update(
            &db,
            created.id,
            UpdateCommunityPostDto {
                description: Some("v1".into()),
                version: Some(0),
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.metadata.version, 1);
        assert_eq!(updated.user, "Ana");

        let stale = update(
            &db,
            created.id,
            UpdateCommunityPostDto {
                description: Some("v2".into()),
                version: Some(0),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            stale,
            ServiceError::VersionConflict {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn update_missing_returns_none() {
        let db = connect_in_memory().await.unwrap();
        let result = update(
            &db,
            CommunityPostId(99),
            UpdateCommunityPostDto {
                description: Some("x".into()),
                version: None,
            },
        )
        .await
        .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let db = connect_in_memory().await.unwrap();
        let created = create(&db, post("Ana", "bye")).await.unwrap();
        assert!(delete(&db, created.id).await.unwrap());
        assert!(!delete(&db, created.id).await.unwrap());
        assert!(get_by_id(&db, created.id).await.unwrap().is_none());
    }
}
