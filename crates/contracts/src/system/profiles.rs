use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::{Role, User, UserId};
use crate::domain::common::{AggregateId, AggregateRoot, EntityMetadata};
use crate::shared::validation::{ValidationErrors, Validator};

pub const AVATAR_URL_MAX_LEN: usize = 255;
pub const LANGUAGE_MAX_LEN: usize = 10;
pub const DEFAULT_LANGUAGE: &str = "es";

crate::aggregate_id!(
    /// Уникальный идентификатор профиля
    ProfileId
);

/// Per-user preferences, one-to-one with [`User`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub avatar_url: Option<String>,
    pub language: String,
    pub notifications_enabled: bool,
    pub alerts_enabled: bool,
    pub metadata: EntityMetadata,
}

impl Profile {
    /// Profile with default settings for a freshly registered user
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            id: ProfileId::unassigned(),
            user_id,
            avatar_url: None,
            language: DEFAULT_LANGUAGE.to_string(),
            notifications_enabled: true,
            alerts_enabled: true,
            metadata: EntityMetadata::new(),
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(avatar_url) = changes.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        if let Some(language) = changes.language {
            self.language = language;
        }
        if let Some(enabled) = changes.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(enabled) = changes.alerts_enabled {
            self.alerts_enabled = enabled;
        }
    }

    /// Settings back to defaults; the avatar is kept
    pub fn reset_settings(&mut self) {
        self.language = DEFAULT_LANGUAGE.to_string();
        self.notifications_enabled = true;
        self.alerts_enabled = true;
    }
}

impl AggregateRoot for Profile {
    type Id = ProfileId;

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
        "sys"
    }

    fn collection_name() -> &'static str {
        "profiles"
    }

    fn element_name() -> &'static str {
        "Profile"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    pub avatar_url: Option<String>,
    pub language: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub alerts_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub avatar_url: Option<String>,
    pub language: Option<String>,
    pub notifications_enabled: Option<bool>,
    pub alerts_enabled: Option<bool>,
}

impl UpdateProfileDto {
    pub fn validate(self) -> Result<ProfileChanges, ValidationErrors> {
        let mut v = Validator::new();
        let avatar_url = v.optional_text("avatarUrl", "Avatar URL", self.avatar_url, AVATAR_URL_MAX_LEN);
        let language = self
            .language
            .map(|l| v.required_text("language", "Language", Some(l), LANGUAGE_MAX_LEN));
        v.finish()?;
        Ok(ProfileChanges {
            avatar_url,
            language,
            notifications_enabled: self.notifications_enabled,
            alerts_enabled: self.alerts_enabled,
        })
    }
}

/// User identity merged with profile preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResource {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dni: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub notifications_enabled: bool,
    pub alerts_enabled: bool,
    pub language: String,
    pub updated_at: DateTime<Utc>,
    pub version: i32,
}

impl ProfileResource {
    pub fn from_parts(user: &User, profile: &Profile) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            dni: user.dni.clone(),
            role: user.role,
            avatar_url: profile.avatar_url.clone(),
            notifications_enabled: profile.notifications_enabled,
            alerts_enabled: profile.alerts_enabled,
            language: profile.language.clone(),
            updated_at: profile.metadata.updated_at,
            version: profile.metadata.version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSettingsResource {
    pub language: String,
    pub notifications_enabled: bool,
    pub alerts_enabled: bool,
}

impl From<&Profile> for ProfileSettingsResource {
    fn from(profile: &Profile) -> Self {
        Self {
            language: profile.language.clone(),
            notifications_enabled: profile.notifications_enabled,
            alerts_enabled: profile.alerts_enabled,
        }
    }
}
