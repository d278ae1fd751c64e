use contracts::domain::a001_community_post::aggregate::{CommunityPost, CommunityPostId};
use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set};

use crate::shared::data::query::contains;
use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_community_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user: String,
    pub description: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CommunityPost {
    fn from(m: Model) -> Self {
        CommunityPost {
            id: CommunityPostId(m.id),
            user: m.user,
            description: m.description,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        }
    }
}

fn active_model(post: &CommunityPost) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        user: Set(post.user.clone()),
        description: Set(post.description.clone()),
        created_at: Set(post.metadata.created_at),
        updated_at: Set(post.metadata.updated_at),
        version: Set(post.metadata.version),
    }
}

/// Insert when the id is unassigned, otherwise a version-guarded update
pub async fn save<C: ConnectionTrait>(conn: &C, mut post: CommunityPost) -> ServiceResult<CommunityPost> {
    if !post.id.is_assigned() {
        let model = active_model(&post).insert(conn).await?;
        return Ok(model.into());
    }

    let id = post.id.value();
    let read_version = post.metadata.version;
    post.metadata.increment_version();

    let mut active = active_model(&post);
    active.created_at = NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let actual = Entity::find_by_id(id).one(conn).await?.map(|m| m.version);
        return Err(ServiceError::stale_write(
            CommunityPost::element_name(),
            read_version,
            actual,
        ));
    }
    Ok(post)
}

async fn list<C: ConnectionTrait>(conn: &C, select: Select<Entity>) -> Result<Vec<CommunityPost>, DbErr> {
    Ok(select
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: CommunityPostId) -> Result<Option<CommunityPost>, DbErr> {
    Ok(Entity::find_by_id(id.value()).one(conn).await?.map(Into::into))
}

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<CommunityPost>, DbErr> {
    list(conn, Entity::find()).await
}

pub async fn find_by_user<C: ConnectionTrait>(conn: &C, user: &str) -> Result<Vec<CommunityPost>, DbErr> {
    list(conn, Entity::find().filter(Column::User.eq(user))).await
}

pub async fn find_by_description_containing<C: ConnectionTrait>(
    conn: &C,
    keyword: &str,
) -> Result<Vec<CommunityPost>, DbErr> {
    list(conn, Entity::find().filter(contains(Column::Description, keyword))).await
}

pub async fn exists_by_id<C: ConnectionTrait>(conn: &C, id: CommunityPostId) -> Result<bool, DbErr> {
    Ok(Entity::find_by_id(id.value()).count(conn).await? > 0)
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: CommunityPostId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.value()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
