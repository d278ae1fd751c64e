use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata, Versioned};
use crate::shared::validation::{ValidationErrors, Validator};

pub const USER_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

// ============================================================================
// ID Type
// ============================================================================

crate::aggregate_id!(
    /// Уникальный идентификатор публикации сообщества
    CommunityPostId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Post or farming tip shared with the community
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: CommunityPostId,
    /// Display name of the author
    pub user: String,
    pub description: String,
    pub metadata: EntityMetadata,
}

impl CommunityPost {
    /// Создать новую публикацию для вставки в БД
    pub fn new(data: NewCommunityPost) -> Self {
        Self {
            id: CommunityPostId::unassigned(),
            user: data.user,
            description: data.description,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn update_description(&mut self, description: String) {
        self.description = description;
    }
}

impl AggregateRoot for CommunityPost {
    type Id = CommunityPostId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "community_posts"
    }

    fn element_name() -> &'static str {
        "Community post"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Validated creation command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunityPost {
    pub user: String,
    pub description: String,
}

/// POST payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommunityPostDto {
    pub user: Option<String>,
    pub description: Option<String>,
}

impl CreateCommunityPostDto {
    pub fn validate(self) -> Result<NewCommunityPost, ValidationErrors> {
        let mut v = Validator::new();
        let user = v.required_text("user", "User name", self.user, USER_MAX_LEN);
        let description = v.required_text(
            "description",
            "Description",
            self.description,
            DESCRIPTION_MAX_LEN,
        );
        v.finish()?;
        Ok(NewCommunityPost { user, description })
    }
}

/// PUT payload; only the description is mutable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommunityPostDto {
    pub description: Option<String>,
    pub version: Option<i32>,
}

impl UpdateCommunityPostDto {
    pub fn validate(self) -> Result<Versioned<String>, ValidationErrors> {
        let mut v = Validator::new();
        let description = v.required_text(
            "description",
            "Description",
            self.description,
            DESCRIPTION_MAX_LEN,
        );
        v.finish()?;
        Ok(Versioned::new(description, self.version))
    }
}

// ============================================================================
// Resource
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPostResource {
    pub id: i64,
    pub user: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl From<&CommunityPost> for CommunityPostResource {
    fn from(entity: &CommunityPost) -> Self {
        Self {
            id: entity.id.value(),
            user: entity.user.clone(),
            description: entity.description.clone(),
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
    fn create_dto_rejects_blank_user_and_long_description() {
        let dto = CreateCommunityPostDto {
            user: Some(" ".into()),
            description: Some("d".repeat(DESCRIPTION_MAX_LEN + 1)),
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(errors.message_for("user"), Some("User name is required"));
        assert_eq!(
            errors.message_for("description"),
            Some("Description must not exceed 1000 characters")
        );
    }

    #[test]
    fn resource_is_flat_camel_case() {
        let post = CommunityPost::new(NewCommunityPost {
            user: "ana".into(),
            description: "Rotate crops every season".into(),
        });
        let value = serde_json::to_value(CommunityPostResource::from(&post)).unwrap();
        assert_eq!(value["user"], "ana");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["id"], 0);
    }
}
