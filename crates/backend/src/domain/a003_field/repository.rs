use contracts::domain::a003_field::aggregate::{Field, FieldId};
use contracts::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, PaginatorTrait, QueryOrder, Set};

use crate::shared::data::query::contains;
use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_fields")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub product: String,
    pub location: String,
    pub field_size: String,
    pub crop: String,
    pub days_since_planting: i32,
    pub planting_date: Date,
    pub expected_harvest_date: Date,
    pub soil_type: String,
    pub watering: String,
    pub sunlight: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::a004_task::repository::Entity")]
    Task,
}

impl Related<crate::domain::a004_task::repository::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Field {
    fn from(m: Model) -> Self {
        Field {
            id: FieldId(m.id),
            name: m.name,
            image_url: m.image_url,
            product: m.product,
            location: m.location,
            field_size: m.field_size,
            crop: m.crop,
            days_since_planting: m.days_since_planting,
            planting_date: m.planting_date,
            expected_harvest_date: m.expected_harvest_date,
            soil_type: m.soil_type,
            watering: m.watering,
            sunlight: m.sunlight,
            status: m.status,
            metadata: EntityMetadata {
                created_at: m.created_at,
                updated_at: m.updated_at,
                version: m.version,
            },
        }
    }
}

fn active_model(field: &Field) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(field.name.clone()),
        image_url: Set(field.image_url.clone()),
        product: Set(field.product.clone()),
        location: Set(field.location.clone()),
        field_size: Set(field.field_size.clone()),
        crop: Set(field.crop.clone()),
        days_since_planting: Set(field.days_since_planting),
        planting_date: Set(field.planting_date),
        expected_harvest_date: Set(field.expected_harvest_date),
        soil_type: Set(field.soil_type.clone()),
        watering: Set(field.watering.clone()),
        sunlight: Set(field.sunlight.clone()),
        status: Set(field.status.clone()),
        created_at: Set(field.metadata.created_at),
        updated_at: Set(field.metadata.updated_at),
        version: Set(field.metadata.version),
    }
}

pub async fn save<C: ConnectionTrait>(conn: &C, mut field: Field) -> ServiceResult<Field> {
    if !field.id.is_assigned() {
        let model = active_model(&field).insert(conn).await?;
        return Ok(model.into());
    }

    let id = field.id.value();
    let read_version = field.metadata.version;
    field.metadata.increment_version();

    let mut active = active_model(&field);
    active.created_at = NotSet;
    let result = Entity::update_many()
        .set(active)
        .filter(Column::Id.eq(id))
        .filter(Column::Version.eq(read_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let actual = Entity::find_by_id(id).one(conn).await?.map(|m| m.version);
        return Err(ServiceError::stale_write(Field::element_name(), read_version, actual));
    }
    Ok(field)
}

async fn list<C: ConnectionTrait>(conn: &C, select: Select<Entity>) -> Result<Vec<Field>, DbErr> {
    Ok(select
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: FieldId) -> Result<Option<Field>, DbErr> {
    Ok(Entity::find_by_id(id.value()).one(conn).await?.map(Into::into))
}

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find()).await
}

// ====== Equality finders ======

pub async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::Name.eq(name))).await
}

pub async fn find_by_crop<C: ConnectionTrait>(conn: &C, crop: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::Crop.eq(crop))).await
}

pub async fn find_by_product<C: ConnectionTrait>(conn: &C, product: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::Product.eq(product))).await
}

pub async fn find_by_location<C: ConnectionTrait>(conn: &C, location: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::Location.eq(location))).await
}

pub async fn find_by_status<C: ConnectionTrait>(conn: &C, status: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::Status.eq(status))).await
}

pub async fn find_by_soil_type<C: ConnectionTrait>(conn: &C, soil_type: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::SoilType.eq(soil_type))).await
}

// ====== Containment and ranges ======

pub async fn find_by_name_containing<C: ConnectionTrait>(conn: &C, keyword: &str) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(contains(Column::Name, keyword))).await
}

pub async fn find_by_planting_date_after<C: ConnectionTrait>(conn: &C, date: Date) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::PlantingDate.gt(date))).await
}

pub async fn find_by_expected_harvest_date_before<C: ConnectionTrait>(
    conn: &C,
    date: Date,
) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::ExpectedHarvestDate.lt(date))).await
}

pub async fn find_by_days_since_planting_greater_than<C: ConnectionTrait>(
    conn: &C,
    days: i32,
) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::DaysSincePlanting.gt(days))).await
}

pub async fn find_by_days_since_planting_less_than<C: ConnectionTrait>(
    conn: &C,
    days: i32,
) -> Result<Vec<Field>, DbErr> {
    list(conn, Entity::find().filter(Column::DaysSincePlanting.lt(days))).await
}

pub async fn exists_by_id<C: ConnectionTrait>(conn: &C, id: FieldId) -> Result<bool, DbErr> {
    Ok(Entity::find_by_id(id.value()).count(conn).await? > 0)
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: FieldId) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.value()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
