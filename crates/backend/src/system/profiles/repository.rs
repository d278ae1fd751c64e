use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use contracts::system::profiles::{Profile, ProfileId};
use contracts::system::users::UserId;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Set};

use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    pub avatar_url: Option<String>,
    pub language: String,
    pub notifications_enabled: bool,
    pub alerts_enabled: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::system::users::repository::Entity",
        from = "Column::UserId",
        to = "crate::system::users::repository::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::system::users::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Profile {
    fn from(m: Model) -> Self {
        Profile {
            id: ProfileId(m.id),
            user_id: UserId(m.user_id),
            avatar_url: m.avatar_url,
            language: m.language,
            notifications_enabled: m.notifications_enabled,
            alerts_enabled: m.alerts_enabled,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        }
    }
}

fn active_model(profile: &Profile) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        user_id: Set(profile.user_id.value()),
        avatar_url: Set(profile.avatar_url.clone()),
        language: Set(profile.language.clone()),
        notifications_enabled: Set(profile.notifications_enabled),
        alerts_enabled: Set(profile.alerts_enabled),
        created_at: Set(profile.metadata.created_at),
        updated_at: Set(profile.metadata.updated_at),
        version: Set(profile.metadata.version),
    }
}

pub async fn save<C: ConnectionTrait>(conn: &C, mut profile: Profile) -> ServiceResult<Profile> {
    if !profile.id.is_assigned() {
        let model = active_model(&profile).insert(conn).await?;
        return Ok(model.into());
    }

    let id = profile.id.value();
    let read_version = profile.metadata.version;
    profile.metadata.increment_version();

    let mut active = active_model(&profile);
    active.created_at = NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let actual = Entity::find_by_id(id).one(conn).await?.map(|m| m.version);
        return Err(ServiceError::stale_write(Profile::element_name(), read_version, actual));
    }
    Ok(profile)
}

pub async fn find_by_user_id<C: ConnectionTrait>(conn: &C, user_id: UserId) -> Result<Option<Profile>, DbErr> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id.value()))
        .one(conn)
        .await?
        .map(Into::into))
}

pub async fn delete_by_user_id<C: ConnectionTrait>(conn: &C, user_id: UserId) -> Result<bool, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::UserId.eq(user_id.value()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
