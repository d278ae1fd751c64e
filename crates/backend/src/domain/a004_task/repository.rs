use chrono::NaiveDate;
use contracts::domain::a003_field::aggregate::FieldId;
use contracts::domain::a004_task::aggregate::{Task, TaskId};
use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set};

use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub field_id: i64,
    pub date: Date,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::a003_field::repository::Entity",
        from = "Column::FieldId",
        to = "crate::domain::a003_field::repository::Column::Id",
        on_delete = "Cascade"
    )]
    Field,
}

impl Related<crate::domain::a003_field::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Field.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Task {
    fn from(m: Model) -> Self {
        Task {
            id: TaskId(m.id),
            field_id: FieldId(m.field_id),
            date: m.date,
            name: m.name,
            description: m.description,
            completed: m.completed,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        }
    }
}

fn active_model(task: &Task) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        field_id: Set(task.field_id.value()),
        date: Set(task.date),
        name: Set(task.name.clone()),
        description: Set(task.description.clone()),
        completed: Set(task.completed),
        created_at: Set(task.metadata.created_at),
        updated_at: Set(task.metadata.updated_at),
        version: Set(task.metadata.version),
    }
}

pub async fn save<C: ConnectionTrait>(conn: &C, mut task: Task) -> ServiceResult<Task> {
    if !task.id.is_assigned() {
        let model = active_model(&task).insert(conn).await?;
        return Ok(model.into());
    }

    let id = task.id.value();
    let read_version = task.metadata.version;
    task.metadata.increment_version();

    let mut active = active_model(&task);
    active.created_at = NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let actual = Entity::find_by_id(id).one(conn).await?.map(|m| m.version);
        return Err(ServiceError::stale_write(Task::element_name(), read_version, actual));
    }
    Ok(task)
}

async fn list<C: ConnectionTrait>(conn: &C, select: Select<Entity>) -> Result<Vec<Task>, DbErr> {
    Ok(select
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: TaskId) -> Result<Option<Task>, DbErr> {
    Ok(Entity::find_by_id(id.value()).one(conn).await?.map(Into::into))
}

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Task>, DbErr> {
    list(conn, Entity::find()).await
}

pub async fn find_by_field_id<C: ConnectionTrait>(conn: &C, field_id: FieldId) -> Result<Vec<Task>, DbErr> {
    list(conn, Entity::find().filter(Column::FieldId.eq(field_id.value()))).await
}

/// Not completed and dated strictly after `today`
pub async fn find_upcoming<C: ConnectionTrait>(conn: &C, today: NaiveDate) -> Result<Vec<Task>, DbErr> {
    list(
        conn,
        Entity::find()
            .filter(Column::Completed.eq(false))
            .filter(Column::Date.gt(today)),
    )
    .await
}

pub async fn exists_by_id<C: ConnectionTrait>(conn: &C, id: TaskId) -> Result<bool, DbErr> {
    Ok(Entity::find_by_id(id.value()).count(conn).await? > 0)
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: TaskId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.value()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

/// Remove every task of a field; returns how many went
pub async fn delete_by_field_id<C: ConnectionTrait>(conn: &C, field_id: FieldId) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::FieldId.eq(field_id.value()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
