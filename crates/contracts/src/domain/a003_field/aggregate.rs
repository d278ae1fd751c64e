use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata, Versioned};
use crate::shared::validation::{ValidationErrors, Validator};

pub const NAME_MAX_LEN: usize = 200;
pub const IMAGE_URL_MAX_LEN: usize = 500;
pub const SHORT_TEXT_MAX_LEN: usize = 100;
pub const FIELD_SIZE_MAX_LEN: usize = 50;
pub const STATUS_MAX_LEN: usize = 50;

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор поля
    FieldId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Агрокультурное поле: общая информация, культура, полив и состояние
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    /// e.g. "Campo de Granos, Los Grandes"
    pub name: String,
    pub image_url: Option<String>,
    /// Main product, e.g. "Trigo"
    pub product: String,
    pub location: String,
    /// Free-form size, e.g. "5,000 m2"
    pub field_size: String,
    pub crop: String,
    pub days_since_planting: i32,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub soil_type: String,
    /// Watering schedule, e.g. "2x daily, 1500L each time"
    pub watering: String,
    /// Sun exposure, e.g. "7 hours/day"
    pub sunlight: String,
    pub status: String,
    pub metadata: EntityMetadata,
}

impl Field {
    pub fn new(data: FieldData) -> Self {
        let mut field = Self {
            id: FieldId::unassigned(),
            name: String::new(),
            image_url: None,
            product: String::new(),
            location: String::new(),
            field_size: String::new(),
            crop: String::new(),
            days_since_planting: 0,
            planting_date: data.planting_date,
            expected_harvest_date: data.expected_harvest_date,
            soil_type: String::new(),
            watering: String::new(),
            sunlight: String::new(),
            status: String::new(),
            metadata: EntityMetadata::new(),
        };
        field.update(data);
        field
    }

    /// Full replace of every mutable attribute
    pub fn update(&mut self, data: FieldData) {
        self.name = data.name;
        self.image_url = data.image_url;
        self.product = data.product;
        self.location = data.location;
        self.field_size = data.field_size;
        self.crop = data.crop;
        self.days_since_planting = data.days_since_planting;
        self.planting_date = data.planting_date;
        self.expected_harvest_date = data.expected_harvest_date;
        self.soil_type = data.soil_type;
        self.watering = data.watering;
        self.sunlight = data.sunlight;
        self.status = data.status;
    }

    pub fn update_status(&mut self, status: String) {
        self.status = status;
    }
}

impl AggregateRoot for Field {
    type Id = FieldId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "fields"
    }

    fn element_name() -> &'static str {
        "Field"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldData {
    pub name: String,
    pub image_url: Option<String>,
    pub product: String,
    pub location: String,
    pub field_size: String,
    pub crop: String,
    pub days_since_planting: i32,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub soil_type: String,
    pub watering: String,
    pub sunlight: String,
    pub status: String,
}

/// POST / PUT payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDto {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub product: Option<String>,
    pub location: Option<String>,
    pub field_size: Option<String>,
    pub crop: Option<String>,
    pub days_since_planting: Option<i32>,
    pub planting_date: Option<NaiveDate>,
    pub expected_harvest_date: Option<NaiveDate>,
    pub soil_type: Option<String>,
    pub watering: Option<String>,
    pub sunlight: Option<String>,
    pub status: Option<String>,
    pub version: Option<i32>,
}

impl FieldDto {
    pub fn validate(self) -> Result<Versioned<FieldData>, ValidationErrors> {
        let mut v = Validator::new();
        let data = FieldData {
            name: v.required_text("name", "Name", self.name, NAME_MAX_LEN),
            image_url: v.optional_text("imageUrl", "Image URL", self.image_url, IMAGE_URL_MAX_LEN),
            product: v.required_text("product", "Product", self.product, SHORT_TEXT_MAX_LEN),
            location: v.required_text("location", "Location", self.location, SHORT_TEXT_MAX_LEN),
            field_size: v.required_text("fieldSize", "Field size", self.field_size, FIELD_SIZE_MAX_LEN),
            crop: v.required_text("crop", "Crop", self.crop, SHORT_TEXT_MAX_LEN),
            days_since_planting: v.required(
                "daysSincePlanting",
                "Days since planting",
                self.days_since_planting,
            ),
            planting_date: v.required("plantingDate", "Planting date", self.planting_date),
            expected_harvest_date: v.required(
                "expectedHarvestDate",
                "Expected harvest date",
                self.expected_harvest_date,
            ),
            soil_type: v.required_text("soilType", "Soil type", self.soil_type, SHORT_TEXT_MAX_LEN),
            watering: v.required_text("watering", "Watering info", self.watering, SHORT_TEXT_MAX_LEN),
            sunlight: v.required_text("sunlight", "Sunlight info", self.sunlight, SHORT_TEXT_MAX_LEN),
            status: v.required_text("status", "Status", self.status, STATUS_MAX_LEN),
        };
        v.finish()?;
        Ok(Versioned::new(data, self.version))
    }
}

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
pub struct FieldResource {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub product: String,
    pub location: String,
    pub field_size: String,
    pub crop: String,
    pub days_since_planting: i32,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub soil_type: String,
    pub watering: String,
    pub sunlight: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<&Field> for FieldResource {
    fn from(entity: &Field) -> Self {
        Self {
            id: entity.id.value(),
            name: entity.name.clone(),
            image_url: entity.image_url.clone(),
            product: entity.product.clone(),
            location: entity.location.clone(),
            field_size: entity.field_size.clone(),
            crop: entity.crop.clone(),
            days_since_planting: entity.days_since_planting,
            planting_date: entity.planting_date,
            expected_harvest_date: entity.expected_harvest_date,
            soil_type: entity.soil_type.clone(),
            watering: entity.watering.clone(),
            sunlight: entity.sunlight.clone(),
            status: entity.status.clone(),
            created_at: entity.metadata.created_at,
            updated_at: entity.metadata.updated_at,
            version: entity.metadata.version,
        }
    }
}
