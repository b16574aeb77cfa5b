use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Tunables shared by the classifier, the calendar and notification
/// planning. Callers keep one of these per app session; `Default`
/// matches the shipped behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Upper bound (inclusive) of the "upcoming" bucket, in days from today.
    pub upcoming_threshold_days: i64,
    /// First weekday of a calendar row.
    pub week_start: Weekday,
    /// Local wall-clock hour at which reminders fire.
    pub notification_hour: u32,
    pub notification_minute: u32,
    /// Accepted range for an item's replacement cycle.
    pub min_cycle_days: u16,
    pub max_cycle_days: u16,
    /// Cycle lengths offered as one-tap presets. Display only.
    pub cycle_presets: Vec<u16>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            upcoming_threshold_days: 3,
            week_start: Weekday::Sun,
            notification_hour: 9,
            notification_minute: 0,
            min_cycle_days: 1,
            max_cycle_days: 365,
            cycle_presets: vec![7, 14, 30, 60, 90, 180, 365],
        }
    }
}
