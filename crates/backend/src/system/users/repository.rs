use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use contracts::system::users::{Role, User, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, Set, SqlErr};

use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sys_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub dni: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "crate::system::profiles::repository::Entity")]
    Profile,
}

impl Related<crate::system::profiles::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = DbErr;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let role = m
            .role
            .parse::<Role>()
            .map_err(|e| DbErr::Custom(format!("user {}: {}", m.id, e)))?;
        Ok(User {
            id: UserId(m.id),
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            password_hash: m.password_hash,
            dni: m.dni,
            role,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        })
    }
}

fn active_model(user: &User) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        dni: Set(user.dni.clone()),
        role: Set(user.role.as_str().to_string()),
        created_at: Set(user.metadata.created_at),
        updated_at: Set(user.metadata.updated_at),
        version: Set(user.metadata.version),
    }
}

/// A unique index beat the service-level check (concurrent signup)
fn map_unique_violation(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("email") => {
            ServiceError::conflict("email", "Email is already registered")
        }
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("dni") => {
            ServiceError::conflict("dni", "DNI is already registered")
        }
        _ => err.into(),
    }
}

pub async fn save<C: ConnectionTrait>(conn: &C, mut user: User) -> ServiceResult<User> {
    if !user.id.is_assigned() {
        let model = active_model(&user)
            .insert(conn)
            .await
            .map_err(map_unique_violation)?;
        return Ok(User::try_from(model)?);
    }

    let id = user.id.value();
    let read_version = user.metadata.version;
    user.metadata.increment_version();

    let mut active = active_model(&user);
    active.created_at = NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await
        .map_err(map_unique_violation)?;

    if result.rows_affected == 0 {
        let actual = Entity::find_by_id(id).one(conn).await?.map(|m| m.version);
        return Err(ServiceError::stale_write(User::element_name(), read_version, actual));
    }
    Ok(user)
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: UserId) -> Result<Option<User>, DbErr> {
    Entity::find_by_id(id.value())
        .one(conn)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<User>, DbErr> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(conn)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn exists_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<bool, DbErr> {
    Ok(Entity::find().filter(Column::Email.eq(email)).count(conn).await? > 0)
}

pub async fn exists_by_dni<C: ConnectionTrait>(conn: &C, dni: &str) -> Result<bool, DbErr> {
    Ok(Entity::find().filter(Column::Dni.eq(dni)).count(conn).await? > 0)
}

pub async fn count<C: ConnectionTrait>(conn: &C) -> Result<u64, DbErr> {
    Entity::find().count(conn).await
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: UserId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.value()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
