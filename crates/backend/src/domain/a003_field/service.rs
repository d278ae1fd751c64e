use chrono::NaiveDate;
use contracts::domain::a003_field::aggregate::{self, Field, FieldDto, FieldId};
use contracts::domain::common::AggregateRoot;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::domain::a004_task;
use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldFilter {
    All,
    Name(String),
    Crop(String),
    Product(String),
    Location(String),
    Status(String),
    SoilType(String),
    NameContaining(String),
    PlantedAfter(NaiveDate),
    HarvestBefore(NaiveDate),
    /// days since planting strictly greater than
    MinDays(i32),
    /// days since planting strictly less than
    MaxDays(i32),
}

pub async fn create(db: &DatabaseConnection, dto: FieldDto) -> ServiceResult<Field> {
    let cmd = dto.validate()?;
    let field = Field::new(cmd.data);

    let txn = db.begin().await?;
    let saved = repository::save(&txn, field).await?;
    txn.commit().await?;

    tracing::info!("Field {} '{}' created", saved.id, saved.name);
    Ok(saved)
}

pub async fn get_by_id(db: &DatabaseConnection, id: FieldId) -> ServiceResult<Option<Field>> {
    Ok(repository::find_by_id(db, id).await?)
}

pub async fn list(db: &DatabaseConnection, filter: FieldFilter) -> ServiceResult<Vec<Field>> {
    use FieldFilter::*;

    let fields = match filter {
        All => repository::find_all(db).await?,
        Name(v) => repository::find_by_name(db, &v).await?,
        Crop(v) => repository::find_by_crop(db, &v).await?,
        Product(v) => repository::find_by_product(db, &v).await?,
        Location(v) => repository::find_by_location(db, &v).await?,
        Status(v) => repository::find_by_status(db, &v).await?,
        SoilType(v) => repository::find_by_soil_type(db, &v).await?,
        NameContaining(keyword) => repository::find_by_name_containing(db, &keyword).await?,
        PlantedAfter(date) => repository::find_by_planting_date_after(db, date).await?,
        HarvestBefore(date) => repository::find_by_expected_harvest_date_before(db, date).await?,
        MinDays(days) => repository::find_by_days_since_planting_greater_than(db, days).await?,
        MaxDays(days) => repository::find_by_days_since_planting_less_than(db, days).await?,
    };
    Ok(fields)
}

pub async fn update(db: &DatabaseConnection, id: FieldId, dto: FieldDto) -> ServiceResult<Option<Field>> {
    let cmd = dto.validate()?;

    let txn = db.begin().await?;
    let Some(mut field) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    ServiceError::check_version(cmd.expected_version, field.metadata.version)?;

    field.update(cmd.data);
    field.before_write();
    let saved = repository::save(&txn, field).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

pub async fn update_status(
    db: &DatabaseConnection,
    id: FieldId,
    status: Option<String>,
) -> ServiceResult<Option<Field>> {
    let status = aggregate::validate_status(status)?;

    let txn = db.begin().await?;
    let Some(mut field) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    field.update_status(status);
    field.before_write();
    let saved = repository::save(&txn, field).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

/// Deletes the field together with its tasks
pub async fn delete(db: &DatabaseConnection, id: FieldId) -> ServiceResult<bool> {
    let txn = db.begin().await?;
    if !repository::exists_by_id(&txn, id).await? {
        return Ok(false);
    }
    let tasks_removed = a004_task::repository::delete_by_field_id(&txn, id).await?;
    repository::delete_by_id(&txn, id).await?;
    txn.commit().await?;

    tracing::info!("Field {} deleted with {} task(s)", id, tasks_removed);
    Ok(true)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use contracts::domain::a003_field::aggregate::FieldResource;
    use crate::shared::data::db::connect_in_memory;

    pub(crate) fn field_dto(name: &str, status: &str, days: i32) -> FieldDto {
        FieldDto {
            name: Some(name.into()),
            image_url: Some("https://img/field.png".into()),
            product: Some("Trigo".into()),
            location: Some("Lurin".into()),
            field_size: Some("5,000 m2".into()),
            crop: Some("Trigo".into()),
            days_since_planting: Some(days),
            planting_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            expected_harvest_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            soil_type: Some("Loamy".into()),
            watering: Some("2x daily".into()),
            sunlight: Some("7 hours/day".into()),
            status: Some(status.into()),
            version: None,
        }
    }

    #[tokio::test]
    async fn filter_by_status() {
        let db = connect_in_memory().await.unwrap();
        create(&db, field_dto("A", "Healthy", 10)).await.unwrap();
        create(&db, field_dto("B", "Healthy", 20)).await.unwrap();
        create(&db, field_dto("C", "Stressed", 30)).await.unwrap();

        let healthy = list(&db, FieldFilter::Status("Healthy".into())).await.unwrap();
        let names: Vec<&str> = healthy.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[tokio::test]
    async fn day_bounds_are_exclusive() {
        let db = connect_in_memory().await.unwrap();
        create(&db, field_dto("A", "Healthy", 10)).await.unwrap();
        create(&db, field_dto("B", "Healthy", 20)).await.unwrap();
        create(&db, field_dto("C", "Healthy", 30)).await.unwrap();

        assert_eq!(list(&db, FieldFilter::MinDays(20)).await.unwrap().len(), 1);
        assert_eq!(list(&db, FieldFilter::MaxDays(20)).await.unwrap().len(), 1);
        assert_eq!(list(&db, FieldFilter::MinDays(0)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let db = connect_in_memory().await.unwrap();
        let created = create(&db, field_dto("A", "Healthy", 10)).await.unwrap();

        let mut first = field_dto("A1", "Healthy", 11);
        first.version = Some(0);
        update(&db, created.id, first).await.unwrap().unwrap();

        let mut second = field_dto("A2", "Healthy", 12);
        second.version = Some(0);
        let err = update(&db, created.id, second).await.unwrap_err();
        assert!(matches!(err, ServiceError::VersionConflict { .. }));

        let stored = get_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "A1");
    }

    #[tokio::test]
    async fn image_url_may_be_cleared() {
        let db = connect_in_memory().await.unwrap();
        let created = create(&db, field_dto("A", "Healthy", 10)).await.unwrap();
        assert!(created.image_url.is_some());

        let mut dto = field_dto("A", "Healthy", 10);
        dto.image_url = None;
        let updated = update(&db, created.id, dto).await.unwrap().unwrap();
        assert_eq!(updated.image_url, None);
    }

    #[tokio::test]
    async fn create_then_read_round_trip() {
        let db = connect_in_memory().await.unwrap();
        let created = create(&db, field_dto("Lote Sur", "Healthy", 15)).await.unwrap();

        let found = get_by_id(&db, created.id).await.unwrap().unwrap();
        let resource = FieldResource::from(&found);
        assert!(resource.id > 0);
        assert_eq!(resource.name, "Lote Sur");
        assert_eq!(resource.image_url.as_deref(), Some("https://img/field.png"));
        assert_eq!(resource.product, "Trigo");
        assert_eq!(resource.location, "Lurin");
        assert_eq!(resource.field_size, "5,000 m2");
        assert_eq!(resource.crop, "Trigo");
        assert_eq!(resource.days_since_planting, 15);
        assert_eq!(Some(resource.planting_date), NaiveDate::from_ymd_opt(2025, 1, 10));
        assert_eq!(Some(resource.expected_harvest_date), NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(resource.soil_type, "Loamy");
        assert_eq!(resource.watering, "2x daily");
        assert_eq!(resource.sunlight, "7 hours/day");
        assert_eq!(resource.status, "Healthy");
        assert_eq!(resource.version, 0);
        assert_eq!(resource.created_at, resource.updated_at);
        assert_eq!(resource, FieldResource::from(&created));
    }
}
