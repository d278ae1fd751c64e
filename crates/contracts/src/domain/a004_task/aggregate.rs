use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a003_field::aggregate::FieldId;
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata, Versioned};
use crate::shared::validation::{ValidationErrors, Validator};

pub const NAME_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 500;

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор задачи
    TaskId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Operational task scheduled on a field.
///
/// `completed` only moves from `false` to `true` (dashboard checkbox).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owning field; deleting the field deletes its tasks
    pub field_id: FieldId,
    pub date: NaiveDate,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub metadata: EntityMetadata,
}

impl Task {
    pub fn new(data: NewTask) -> Self {
        Self {
            id: TaskId::unassigned(),
            field_id: data.field_id,
            date: data.details.date,
            name: data.details.name,
            description: data.details.description,
            completed: false,
            metadata: EntityMetadata::new(),
        }
    }

    /// Replaces the schedule and wording; completion and field stay as they are
    pub fn update(&mut self, details: TaskDetails) {
        self.date = details.date;
        self.name = details.name;
        self.description = details.description;
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

impl AggregateRoot for Task {
    type Id = TaskId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "tasks"
    }

    fn element_name() -> &'static str {
        "Task"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub date: NaiveDate,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub field_id: FieldId,
    pub details: TaskDetails,
}

fn validate_details(
    v: &mut Validator,
    date: Option<NaiveDate>,
    name: Option<String>,
    description: Option<String>,
) -> TaskDetails {
    TaskDetails {
        date: v.required("date", "Task date", date),
        name: v.required_text("name", "Name", name, NAME_MAX_LEN),
        description: v.required_text(
            "description",
            "Description",
            description,
            DESCRIPTION_MAX_LEN,
        ),
    }
}

/// POST payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDto {
    pub field_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateTaskDto {
    pub fn validate(self) -> Result<NewTask, ValidationErrors> {
        let mut v = Validator::new();
        let field_id = v.required("fieldId", "Field ID", self.field_id);
        let details = validate_details(&mut v, self.date, self.name, self.description);
        v.finish()?;
        Ok(NewTask {
            field_id: FieldId(field_id),
            details,
        })
    }
}

/// PUT payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskDto {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<i32>,
}

impl UpdateTaskDto {
    pub fn validate(self) -> Result<Versioned<TaskDetails>, ValidationErrors> {
        let mut v = Validator::new();
        let details = validate_details(&mut v, self.date, self.name, self.description);
        v.finish()?;
        Ok(Versioned::new(details, self.version))
    }
}

// ============================================================================
// Resource
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResource {
    pub id: i64,
    pub field_id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<&Task> for TaskResource {
    fn from(entity: &Task) -> Self {
        Self {
            id: entity.id.value(),
            field_id: entity.field_id.value(),
            date: entity.date,
            name: entity.name.clone(),
            description: entity.description.clone(),
            completed: entity.completed,
            created_at: entity.metadata.created_at,
            updated_at: entity.metadata.updated_at,
            version: entity.metadata.version,
        }
    }
}
