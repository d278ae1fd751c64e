use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata, Versioned};
use crate::shared::validation::{ValidationErrors, Validator};

pub const TITLE_MAX_LEN: usize = 100;
pub const FIELD_MAX_LEN: usize = 200;
pub const STATUS_MAX_LEN: usize = 50;

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор посева
    CropFieldId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Crop planted on a field, with its planting window and health status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropField {
    pub id: CropFieldId,
    /// Crop name, e.g. "Wheat"
    pub title: String,
    /// Days since planting or until harvest
    pub days: i32,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    /// Field location or name, e.g. "Grain Field, Los Grandes"
    pub field: String,
    /// Health status, e.g. "Healthy"
    pub status: String,
    pub metadata: EntityMetadata,
}

impl CropField {
    pub fn new(data: CropFieldData) -> Self {
        Self {
            id: CropFieldId::unassigned(),
            title: data.title,
            days: data.days,
            planting_date: data.planting_date,
            harvest_date: data.harvest_date,
            field: data.field,
            status: data.status,
            metadata: EntityMetadata::new(),
        }
    }

    /// Full replace of every mutable attribute
    pub fn update(&mut self, data: CropFieldData) {
        self.title = data.title;
        self.days = data.days;
        self.planting_date = data.planting_date;
        self.harvest_date = data.harvest_date;
        self.field = data.field;
        self.status = data.status;
    }

    pub fn update_status(&mut self, status: String) {
        self.status = status;
    }
}

impl AggregateRoot for CropField {
    type Id = CropFieldId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "crop_fields"
    }

    fn element_name() -> &'static str {
        "Crop field"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Validated attribute set, used for both create and full update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropFieldData {
    pub title: String,
    pub days: i32,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub field: String,
    pub status: String,
}

/// POST / PUT payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropFieldDto {
    pub title: Option<String>,
    pub days: Option<i32>,
    pub planting_date: Option<NaiveDate>,
    pub harvest_date: Option<NaiveDate>,
    pub field: Option<String>,
    pub status: Option<String>,
    /// Version the client last read; ignored on create
    pub version: Option<i32>,
}

impl CropFieldDto {
    pub fn validate(self) -> Result<Versioned<CropFieldData>, ValidationErrors> {
        let mut v = Validator::new();
        let title = v.required_text("title", "Title", self.title, TITLE_MAX_LEN);
        let days = v.required("days", "Days", self.days);
        let planting_date = v.required("plantingDate", "Planting date", self.planting_date);
        let harvest_date = v.required("harvestDate", "Harvest date", self.harvest_date);
        let field = v.required_text("field", "Field location", self.field, FIELD_MAX_LEN);
        let status = v.required_text("status", "Status", self.status, STATUS_MAX_LEN);
        v.finish()?;
        Ok(Versioned::new(
            CropFieldData {
                title,
                days,
                planting_date,
                harvest_date,
                field,
                status,
            },
            self.version,
        ))
    }
}

/// Validates the `status` query parameter of the status-only update
pub fn validate_status(status: Option<String>) -> Result<String, ValidationErrors> {
    let mut v = Validator::new();
    let status = v.required_text("status", "Status", status, STATUS_MAX_LEN);
    v.finish()?;
    Ok(status)
}

// ============================================================================
// Resource
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropFieldResource {
    pub id: i64,
    pub title: String,
    pub days: i32,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub field: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<&CropField> for CropFieldResource {
    fn from(entity: &CropField) -> Self {
        Self {
            id: entity.id.value(),
            title: entity.title.clone(),
            days: entity.days,
            planting_date: entity.planting_date,
            harvest_date: entity.harvest_date,
            field: entity.field.clone(),
            status: entity.status.clone(),
            created_at: entity.metadata.created_at,
            updated_at: entity.metadata.updated_at,
            version: entity.metadata.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_reported_with_wire_names() {
        let dto: CropFieldDto = serde_json::from_str(r#"{"title":"Wheat"}"#).unwrap();
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.message_for("days"), Some("Days is required"));
        assert_eq!(
            errors.message_for("plantingDate"),
            Some("Planting date is required")
        );
        assert_eq!(
            errors.message_for("harvestDate"),
            Some("Harvest date is required")
        );
        assert!(errors.has_field("field"));
        assert!(errors.has_field("status"));
        assert!(!errors.has_field("title"));
    }

    #[test]
    fn dto_parses_calendar_dates() {
        let dto: CropFieldDto = serde_json::from_str(
            r#"{"title":"Corn","days":30,"plantingDate":"2025-03-01",
                "harvestDate":"2025-07-15","field":"North","status":"Healthy","version":2}"#,
        )
        .unwrap();
        let cmd = dto.validate().unwrap();
        assert_eq!(cmd.expected_version, Some(2));
        assert_eq!(
            cmd.data.planting_date,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[test]
    fn status_must_fit_column() {
        assert!(validate_status(None).is_err());
        assert!(validate_status(Some("s".repeat(STATUS_MAX_LEN + 1))).is_err());
        assert_eq!(validate_status(Some("Stressed".into())).unwrap(), "Stressed");
    }
}
