use chrono::NaiveDate;
use contracts::domain::a002_crop_field::aggregate::{self, CropField, CropFieldDto, CropFieldId};
use contracts::domain::common::AggregateRoot;
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropFieldFilter {
    All,
    Title(String),
    Status(String),
    Field(String),
    TitleContaining(String),
    PlantedAfter(NaiveDate),
    HarvestBefore(NaiveDate),
}

pub async fn create(db: &DatabaseConnection, dto: CropFieldDto) -> ServiceResult<CropField> {
    let cmd = dto.validate()?;
    let crop = CropField::new(cmd.data);

    let txn = db.begin().await?;
    let saved = repository::save(&txn, crop).await?;
    txn.commit().await?;

    tracing::info!("Crop field {} '{}' created", saved.id, saved.title);
    Ok(saved)
}

pub async fn get_by_id(db: &DatabaseConnection, id: CropFieldId) -> ServiceResult<Option<CropField>> {
    Ok(repository::find_by_id(db, id).await?)
}

pub async fn list(db: &DatabaseConnection, filter: CropFieldFilter) -> ServiceResult<Vec<CropField>> {
    let crops = match filter {
        CropFieldFilter::All => repository::find_all(db).await?,
        CropFieldFilter::Title(title) => repository::find_by_title(db, &title).await?,
        CropFieldFilter::Status(status) => repository::find_by_status(db, &status).await?,
        CropFieldFilter::Field(field) => repository::find_by_field(db, &field).await?,
        CropFieldFilter::TitleContaining(keyword) => {
            repository::find_by_title_containing(db, &keyword).await?
        }
        CropFieldFilter::PlantedAfter(date) => {
            repository::find_by_planting_date_after(db, date).await?
        }
        CropFieldFilter::HarvestBefore(date) => {
            repository::find_by_harvest_date_before(db, date).await?
        }
    };
    Ok(crops)
}

/// Full replace of all attributes
pub async fn update(
    db: &DatabaseConnection,
    id: CropFieldId,
    dto: CropFieldDto,
) -> ServiceResult<Option<CropField>> {
    let cmd = dto.validate()?;

    let txn = db.begin().await?;
    let Some(mut crop) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    ServiceError::check_version(cmd.expected_version, crop.metadata.version)?;

    crop.update(cmd.data);
    crop.before_write();
    let saved = repository::save(&txn, crop).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

/// Status-only update, other attributes untouched
pub async fn update_status(
    db: &DatabaseConnection,
    id: CropFieldId,
    status: Option<String>,
) -> ServiceResult<Option<CropField>> {
    let status = aggregate::validate_status(status)?;

    let txn = db.begin().await?;
    let Some(mut crop) = repository::find_by_id(&txn, id).await? else {
        return Ok(None);
    };
    crop.update_status(status);
    crop.before_write();
    let saved = repository::save(&txn, crop).await?;
    txn.commit().await?;

    Ok(Some(saved))
}

pub async fn delete(db: &DatabaseConnection, id: CropFieldId) -> ServiceResult<bool> {
    let txn = db.begin().await?;
    if !repository::exists_by_id(&txn, id).await? {
        return Ok(false);
    }
    repository::delete_by_id(&txn, id).await?;
    txn.commit().await?;

    tracing::info!("Crop field {} deleted", id);
    Ok(true)
}
