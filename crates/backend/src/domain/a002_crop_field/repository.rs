use contracts::domain::a002_crop_field::aggregate::{CropField, CropFieldId};
use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set};

use crate::shared::data::query::contains;
use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_crop_fields")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub days: i32,
    pub planting_date: Date,
    pub harvest_date: Date,
    pub field: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CropField {
    fn from(m: Model) -> Self {
        CropField {
            id: CropFieldId(m.id),
            title: m.title,
            days: m.days,
            planting_date: m.planting_date,
            harvest_date: m.harvest_date,
            field: m.field,
            status: m.status,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        }
    }
}

fn active_model(crop: &CropField) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        title: Set(crop.title.clone()),
        days: Set(crop.days),
        planting_date: Set(crop.planting_date),
        harvest_date: Set(crop.harvest_date),
        field: Set(crop.field.clone()),
        status: Set(crop.status.clone()),
        created_at: Set(crop.metadata.created_at),
        updated_at: Set(crop.metadata.updated_at),
        version: Set(crop.metadata.version),
    }
}

pub async fn save<C: ConnectionTrait>(conn: &C, mut crop: CropField) -> ServiceResult<CropField> {
    if !crop.id.is_assigned() {
        let model = active_model(&crop).insert(conn).await?;
        return Ok(model.into());
    }

    let id = crop.id.value();
    let read_version = crop.metadata.version;
    crop.metadata.increment_version();

    let mut active = active_model(&crop);
    active.created_at = NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let actual = Entity::find_by_id(id).one(conn).await?.map(|m| m.version);
        return Err(ServiceError::stale_write(CropField::element_name(), read_version, actual));
    }
    Ok(crop)
}

async fn list<C: ConnectionTrait>(conn: &C, select: Select<Entity>) -> Result<Vec<CropField>, DbErr> {
    Ok(select
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: CropFieldId) -> Result<Option<CropField>, DbErr> {
    Ok(Entity::find_by_id(id.value()).one(conn).await?.map(Into::into))
}

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find()).await
}

pub async fn find_by_title<C: ConnectionTrait>(conn: &C, title: &str) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find().filter(Column::Title.eq(title))).await
}

pub async fn find_by_status<C: ConnectionTrait>(conn: &C, status: &str) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find().filter(Column::Status.eq(status))).await
}

pub async fn find_by_field<C: ConnectionTrait>(conn: &C, field: &str) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find().filter(Column::Field.eq(field))).await
}

pub async fn find_by_title_containing<C: ConnectionTrait>(conn: &C, keyword: &str) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find().filter(contains(Column::Title, keyword))).await
}

/// Strictly after `date`
pub async fn find_by_planting_date_after<C: ConnectionTrait>(conn: &C, date: Date) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find().filter(Column::PlantingDate.gt(date))).await
}

/// Strictly before `date`
pub async fn find_by_harvest_date_before<C: ConnectionTrait>(conn: &C, date: Date) -> Result<Vec<CropField>, DbErr> {
    list(conn, Entity::find().filter(Column::HarvestDate.lt(date))).await
}

pub async fn exists_by_id<C: ConnectionTrait>(conn: &C, id: CropFieldId) -> Result<bool, DbErr> {
    Ok(Entity::find_by_id(id.value()).count(conn).await? > 0)
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: CropFieldId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.value()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
