use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::item::Item;

/// Append-only record of a completion. The item name is copied in at
/// creation time so the log survives deletion of the item; `item_id`
/// may dangle afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionHistory {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl CompletionHistory {
    pub fn record(item: &Item, completed_at: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            item_name: item.name.clone(),
            completed_at,
            note,
        }
    }
}

/// One calendar month of history, newest entries first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthHistories {
    /// First day of the month.
    pub month: NaiveDate,
    pub entries: Vec<CompletionHistory>,
}

/// Group records by calendar month, months descending, entries within
/// a month by completion time descending.
pub fn histories_by_month(histories: &[CompletionHistory]) -> Vec<MonthHistories> {
    let mut months: Vec<MonthHistories> = Vec::new();

    for history in histories {
        let date = history.completed_at.date_naive();
        let month = date.with_day(1).unwrap_or(date);
        match months.iter_mut().find(|bucket| bucket.month == month) {
            Some(bucket) => bucket.entries.push(history.clone()),
            None => months.push(MonthHistories {
                month,
                entries: vec![history.clone()],
            }),
        }
    }

    for bucket in &mut months {
        bucket
            .entries
            .sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(a.id.cmp(&b.id)));
    }
    months.sort_by(|a, b| b.month.cmp(&a.month));
    months
}
