use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;

/// Urgency of an item's due date relative to "today". Never persisted;
/// recomputed on every read because "today" moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DueStatus {
    Overdue { days: u32 },
    Today,
    Tomorrow,
    Upcoming { days: u32 },
    Later { days: u32 },
}

/// Presentation colour associated with a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Danger,
    Warning,
    Secondary,
    Primary,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconTag {
    Expired,
    Warning,
    Upcoming,
    Calendar,
}

impl DueStatus {
    /// Classify a due date against `today`, both at day granularity.
    /// An absent due date is treated as least urgent.
    pub fn classify(due: Option<NaiveDate>, today: NaiveDate, config: &CoreConfig) -> Self {
        let Some(due) = due else {
            return DueStatus::Later { days: 0 };
        };

        let delta = (due - today).num_days();
        if delta < 0 {
            DueStatus::Overdue {
                days: delta.unsigned_abs() as u32,
            }
        } else if delta == 0 {
            DueStatus::Today
        } else if delta == 1 {
            // Always "tomorrow", even when the upcoming threshold is 0.
            DueStatus::Tomorrow
        } else if delta <= config.upcoming_threshold_days {
            DueStatus::Upcoming { days: delta as u32 }
        } else {
            DueStatus::Later { days: delta as u32 }
        }
    }

    /// Sort rank; smaller is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            DueStatus::Overdue { .. } => 0,
            DueStatus::Today => 1,
            DueStatus::Tomorrow => 2,
            DueStatus::Upcoming { .. } => 3,
            DueStatus::Later { .. } => 4,
        }
    }

    /// Overdue, due today or due tomorrow.
    pub fn is_urgent(&self) -> bool {
        self.rank() <= 2
    }

    pub fn display_text(&self) -> String {
        match self {
            DueStatus::Overdue { days } => format!("{days}日超過"),
            DueStatus::Today => "今日".to_string(),
            DueStatus::Tomorrow => "明日".to_string(),
            DueStatus::Upcoming { days } | DueStatus::Later { days } => format!("{days}日後"),
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            DueStatus::Overdue { .. } => ColorTag::Danger,
            DueStatus::Today => ColorTag::Warning,
            DueStatus::Tomorrow => ColorTag::Secondary,
            DueStatus::Upcoming { .. } => ColorTag::Primary,
            DueStatus::Later { .. } => ColorTag::Muted,
        }
    }

    pub fn icon(&self) -> IconTag {
        match self {
            DueStatus::Overdue { .. } => IconTag::Expired,
            DueStatus::Today => IconTag::Warning,
            DueStatus::Tomorrow | DueStatus::Upcoming { .. } => IconTag::Upcoming,
            DueStatus::Later { .. } => IconTag::Calendar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn classify_delta(delta: i64) -> DueStatus {
        let today = day(2024, 6, 15);
        DueStatus::classify(
            Some(today + Duration::days(delta)),
            today,
            &CoreConfig::default(),
        )
    }

    #[test]
    fn buckets_cover_the_whole_delta_range() {
        assert_eq!(classify_delta(-10), DueStatus::Overdue { days: 10 });
        assert_eq!(classify_delta(-1), DueStatus::Overdue { days: 1 });
        assert_eq!(classify_delta(0), DueStatus::Today);
        assert_eq!(classify_delta(1), DueStatus::Tomorrow);
        assert_eq!(classify_delta(2), DueStatus::Upcoming { days: 2 });
        assert_eq!(classify_delta(3), DueStatus::Upcoming { days: 3 });
        assert_eq!(classify_delta(4), DueStatus::Later { days: 4 });
        assert_eq!(classify_delta(120), DueStatus::Later { days: 120 });
    }

    #[test]
    fn rank_is_monotone_in_delta() {
        let mut previous = 0u8;
        for delta in -30..60 {
            let rank = classify_delta(delta).rank();
            assert!(rank >= previous, "rank regressed at delta {delta}");
            previous = rank;
        }
    }

    #[test]
    fn missing_due_date_is_least_urgent() {
        let status = DueStatus::classify(None, day(2024, 6, 15), &CoreConfig::default());
        assert_eq!(status, DueStatus::Later { days: 0 });
        assert_eq!(status.rank(), 4);
        assert!(!status.is_urgent());
    }

    #[test]
    fn tomorrow_wins_over_a_zero_threshold() {
        let config = CoreConfig {
            upcoming_threshold_days: 0,
            ..CoreConfig::default()
        };
        let today = day(2024, 6, 15);
        assert_eq!(
            DueStatus::classify(Some(today + Duration::days(1)), today, &config),
            DueStatus::Tomorrow
        );
        assert_eq!(
            DueStatus::classify(Some(today + Duration::days(2)), today, &config),
            DueStatus::Later { days: 2 }
        );
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let config = CoreConfig {
            upcoming_threshold_days: 5,
            ..CoreConfig::default()
        };
        let today = day(2024, 6, 15);
        assert_eq!(
            DueStatus::classify(Some(today + Duration::days(5)), today, &config),
            DueStatus::Upcoming { days: 5 }
        );
        assert_eq!(
            DueStatus::classify(Some(today + Duration::days(6)), today, &config),
            DueStatus::Later { days: 6 }
        );
    }

    #[test]
    fn five_days_overdue_renders_as_japanese_label() {
        // Scenario: due five days ago.
        let today = day(2024, 6, 15);
        let status = DueStatus::classify(Some(day(2024, 6, 10)), today, &CoreConfig::default());
        assert_eq!(status, DueStatus::Overdue { days: 5 });
        assert_eq!(status.display_text(), "5日超過");
        assert_eq!(status.color(), ColorTag::Danger);
        assert_eq!(status.icon(), IconTag::Expired);
    }

    #[test]
    fn display_labels_for_each_bucket() {
        assert_eq!(classify_delta(0).display_text(), "今日");
        assert_eq!(classify_delta(1).display_text(), "明日");
        assert_eq!(classify_delta(3).display_text(), "3日後");
        assert_eq!(classify_delta(10).display_text(), "10日後");
    }
}
