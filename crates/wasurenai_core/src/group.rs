use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A user-defined bucket items are filed under (rooms in the shipped
/// app). One single grouping dimension; compared by id, never by
/// reference or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub color_hex: String,
    pub icon_name: String,
    pub sort_order: i32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(
        name: impl Into<String>,
        color_hex: impl Into<String>,
        icon_name: impl Into<String>,
        sort_order: i32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyGroupName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            color_hex: color_hex.into(),
            icon_name: icon_name.into(),
            sort_order,
            is_default: false,
            created_at: Utc::now(),
        })
    }
}

const DEFAULT_GROUPS: [(&str, &str, &str); 8] = [
    ("トイレ", "#FF6B6B", "toilet"),
    ("浴室", "#4ECDC4", "bathtub"),
    ("キッチン", "#45B7D1", "refrigerator"),
    ("リビング", "#96CEB4", "sofa"),
    ("洗面所", "#FFEAA7", "sink"),
    ("寝室", "#DDA0DD", "bed"),
    ("玄関", "#8E8E93", "door"),
    ("その他", "#AEAEB2", "ellipsis"),
];

/// The fixed set seeded on first launch when no groups exist yet.
/// These carry `is_default` and cannot be deleted.
pub fn default_groups() -> Vec<Group> {
    DEFAULT_GROUPS
        .iter()
        .enumerate()
        .map(|(index, (name, color, icon))| Group {
            id: Uuid::new_v4(),
            name: (*name).to_string(),
            color_hex: (*color).to_string(),
            icon_name: (*icon).to_string(),
            sort_order: index as i32,
            is_default: true,
            created_at: Utc::now(),
        })
        .collect()
}
