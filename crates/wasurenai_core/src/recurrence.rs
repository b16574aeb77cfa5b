use chrono::{DateTime, Days, Utc};

use crate::{error::ValidationError, history::CompletionHistory, item::Item};

/// Result of completing an item: the advanced item and the history
/// record, to be committed together by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub item: Item,
    pub history: CompletionHistory,
}

/// Complete `item` at `completed_at`.
///
/// The next due date is always the completion day plus the cycle
/// (calendar-day addition, so month and year boundaries roll over
/// correctly); the previous due date never feeds the computation. An
/// item that had no due date is treated as due on the completion day.
pub fn complete(
    item: &Item,
    completed_at: DateTime<Utc>,
    note: Option<String>,
) -> Result<Completion, ValidationError> {
    if item.cycle_days == 0 {
        return Err(ValidationError::CycleOutOfRange {
            got: 0,
            min: 1,
            max: u16::MAX,
        });
    }

    let history = CompletionHistory::record(item, completed_at, note);

    let base = completed_at.date_naive();
    let mut updated = item.clone();
    updated.last_completed_at = Some(completed_at);
    updated.due_date = Some(
        base.checked_add_days(Days::new(u64::from(item.cycle_days)))
            .unwrap_or(base),
    );

    Ok(Completion { item: updated, history })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CoreConfig, due::DueStatus, item::ItemDraft};
    use chrono::{NaiveDate, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 30, 0).unwrap()
    }

    fn item(cycle_days: u16, due: Option<NaiveDate>) -> Item {
        let mut draft = ItemDraft::new("トイレスタンプ", cycle_days);
        draft.due_date = due;
        Item::create(draft, &CoreConfig::default()).unwrap()
    }

    #[test]
    fn next_due_derives_from_completion_day_not_old_due() {
        // Old due 2024-01-30 must be ignored entirely.
        let item = item(2, Some(day(2024, 1, 30)));
        let outcome = complete(&item, at(2024, 2, 1), None).expect("completes");
        assert_eq!(outcome.item.due_date, Some(day(2024, 2, 3)));
        assert_eq!(outcome.item.last_completed_at, Some(at(2024, 2, 1)));
    }

    #[test]
    fn missing_due_date_bases_on_completion_day() {
        let item = item(30, None);
        let outcome = complete(&item, at(2024, 6, 1), None).expect("completes");
        assert_eq!(outcome.item.due_date, Some(day(2024, 7, 1)));
    }

    #[test]
    fn rolls_over_month_and_year_boundaries() {
        let item = item(45, Some(day(2023, 12, 1)));
        let outcome = complete(&item, at(2023, 12, 20), None).expect("completes");
        assert_eq!(outcome.item.due_date, Some(day(2024, 2, 3)));
    }

    #[test]
    fn completing_today_advances_by_the_cycle() {
        // Scenario: due today, 30-day cycle.
        let today = day(2024, 6, 15);
        let item = item(30, Some(today));
        let config = CoreConfig::default();
        assert_eq!(
            DueStatus::classify(item.due_date, today, &config),
            DueStatus::Today
        );

        let completed_at = at(2024, 6, 15);
        let outcome = complete(&item, completed_at, None).expect("completes");
        assert_eq!(outcome.history.completed_at, completed_at);
        assert_eq!(outcome.history.item_name, item.name);
        assert_eq!(outcome.item.due_date, Some(day(2024, 7, 15)));
    }

    #[test]
    fn repeat_completions_yield_distinct_history_records() {
        let item = item(7, Some(day(2024, 6, 15)));
        let first = complete(&item, at(2024, 6, 15), None).expect("completes");
        let second = complete(&first.item, at(2024, 6, 16), None).expect("completes");
        assert_ne!(first.history.id, second.history.id);
        assert_eq!(first.history.item_id, second.history.item_id);
        assert_eq!(second.item.due_date, Some(day(2024, 6, 23)));
    }

    #[test]
    fn zero_cycle_is_rejected_up_front() {
        // Bypass draft validation to exercise the engine precondition.
        let mut broken = item(7, None);
        broken.cycle_days = 0;
        assert!(matches!(
            complete(&broken, at(2024, 6, 15), None),
            Err(ValidationError::CycleOutOfRange { got: 0, .. })
        ));
    }
}
