use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::CoreConfig, error::ValidationError};

/// User-assigned importance of an item, distinct from due-date urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Decode the stored raw value; unknown values fall back to `Medium`.
    pub fn from_raw(raw: i16) -> Self {
        match raw {
            0 => Priority::Low,
            2 => Priority::High,
            _ => Priority::Medium,
        }
    }

    pub fn raw(&self) -> i16 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// Sort rank; high priority sorts first.
    pub fn sort_rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Priority::Low => "低",
            Priority::Medium => "中",
            Priority::High => "高",
        }
    }
}

/// A tracked consumable with a replacement cycle.
///
/// `notify_enabled` and `notify_before_days` are deliberately separate:
/// `notify_before_days == 0` means "remind on the due day itself", and
/// disabling reminders is only ever expressed through the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub group_id: Option<Uuid>,
    pub cycle_days: u16,
    pub due_date: Option<NaiveDate>,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub icon_name: Option<String>,
    pub memo: Option<String>,
    pub priority: Priority,
    pub notify_enabled: bool,
    pub notify_before_days: u16,
    pub created_at: DateTime<Utc>,
}

/// Mutable fields of an item, validated before they touch the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub group_id: Option<Uuid>,
    pub cycle_days: u16,
    pub due_date: Option<NaiveDate>,
    pub icon_name: Option<String>,
    pub memo: Option<String>,
    pub priority: Priority,
    pub notify_enabled: bool,
    pub notify_before_days: u16,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, cycle_days: u16) -> Self {
        Self {
            name: name.into(),
            group_id: None,
            cycle_days,
            due_date: None,
            icon_name: None,
            memo: None,
            priority: Priority::Medium,
            notify_enabled: true,
            notify_before_days: 1,
        }
    }

    pub fn validate(&self, config: &CoreConfig) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
        if self.cycle_days < config.min_cycle_days || self.cycle_days > config.max_cycle_days {
            return Err(ValidationError::CycleOutOfRange {
                got: self.cycle_days,
                min: config.min_cycle_days,
                max: config.max_cycle_days,
            });
        }
        if self.notify_before_days > config.max_cycle_days {
            return Err(ValidationError::NotifyBeforeOutOfRange {
                got: self.notify_before_days,
                max: config.max_cycle_days,
            });
        }
        Ok(())
    }
}

impl Item {
    /// Materialize a validated draft as a fresh item.
    pub fn create(draft: ItemDraft, config: &CoreConfig) -> Result<Self, ValidationError> {
        draft.validate(config)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            group_id: draft.group_id,
            cycle_days: draft.cycle_days,
            due_date: draft.due_date,
            last_completed_at: None,
            icon_name: draft.icon_name,
            memo: draft.memo,
            priority: draft.priority,
            notify_enabled: draft.notify_enabled,
            notify_before_days: draft.notify_before_days,
            created_at: Utc::now(),
        })
    }

    /// Overwrite the editable fields. Id, creation time and the
    /// completion marker are untouched.
    pub fn apply_draft(
        &mut self,
        draft: ItemDraft,
        config: &CoreConfig,
    ) -> Result<(), ValidationError> {
        draft.validate(config)?;
        self.name = draft.name.trim().to_string();
        self.group_id = draft.group_id;
        self.cycle_days = draft.cycle_days;
        self.due_date = draft.due_date;
        self.icon_name = draft.icon_name;
        self.memo = draft.memo;
        self.priority = draft.priority;
        self.notify_enabled = draft.notify_enabled;
        self.notify_before_days = draft.notify_before_days;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_names() {
        let draft = ItemDraft::new("   ", 30);
        assert_eq!(
            draft.validate(&CoreConfig::default()),
            Err(ValidationError::EmptyItemName)
        );
    }

    #[test]
    fn rejects_out_of_range_cycles() {
        let config = CoreConfig::default();
        assert!(matches!(
            ItemDraft::new("歯ブラシ", 0).validate(&config),
            Err(ValidationError::CycleOutOfRange { got: 0, .. })
        ));
        assert!(matches!(
            ItemDraft::new("歯ブラシ", 366).validate(&config),
            Err(ValidationError::CycleOutOfRange { got: 366, .. })
        ));
        assert!(ItemDraft::new("歯ブラシ", 1).validate(&config).is_ok());
        assert!(ItemDraft::new("歯ブラシ", 365).validate(&config).is_ok());
    }

    #[test]
    fn create_trims_the_name_and_starts_uncompleted() {
        let item = Item::create(ItemDraft::new("  食器用洗剤 ", 30), &CoreConfig::default())
            .expect("valid draft");
        assert_eq!(item.name, "食器用洗剤");
        assert!(item.last_completed_at.is_none());
        assert!(item.notify_enabled);
        assert_eq!(item.notify_before_days, 1);
    }

    #[test]
    fn apply_draft_keeps_identity_and_completion_marker() {
        let config = CoreConfig::default();
        let mut item = Item::create(ItemDraft::new("スポンジ", 14), &config).expect("valid");
        let id = item.id;
        let created_at = item.created_at;
        item.last_completed_at = Some(Utc::now());
        let stamp = item.last_completed_at;

        let mut draft = ItemDraft::new("スポンジ（交換用）", 7);
        draft.priority = Priority::High;
        item.apply_draft(draft, &config).expect("valid update");

        assert_eq!(item.id, id);
        assert_eq!(item.created_at, created_at);
        assert_eq!(item.last_completed_at, stamp);
        assert_eq!(item.name, "スポンジ（交換用）");
        assert_eq!(item.cycle_days, 7);
        assert_eq!(item.priority, Priority::High);
    }

    #[test]
    fn priority_raw_round_trip_with_medium_fallback() {
        assert_eq!(Priority::from_raw(0), Priority::Low);
        assert_eq!(Priority::from_raw(1), Priority::Medium);
        assert_eq!(Priority::from_raw(2), Priority::High);
        assert_eq!(Priority::from_raw(99), Priority::Medium);
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            assert_eq!(Priority::from_raw(priority.raw()), priority);
        }
    }

    #[test]
    fn priority_sort_rank_puts_high_first() {
        assert!(Priority::High.sort_rank() < Priority::Medium.sort_rank());
        assert!(Priority::Medium.sort_rank() < Priority::Low.sort_rank());
    }
}
