use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{config::CoreConfig, due::DueStatus, item::Item};

/// Days since the start of the week `date` falls in, under the given
/// week-start convention.
fn days_into_week(weekday: Weekday, week_start: Weekday) -> u32 {
    (weekday.num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7
}

fn first_of_month(anchor: NaiveDate) -> NaiveDate {
    anchor.with_day(1).unwrap_or(anchor)
}

fn last_of_month(anchor: NaiveDate) -> NaiveDate {
    next_month(anchor) - Duration::days(1)
}

/// First day of the month after `anchor`'s.
pub fn next_month(anchor: NaiveDate) -> NaiveDate {
    let first = first_of_month(anchor);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

/// First day of the month before `anchor`'s.
pub fn prev_month(anchor: NaiveDate) -> NaiveDate {
    let first = first_of_month(anchor);
    first.checked_sub_months(Months::new(1)).unwrap_or(first)
}

/// Every date of the calendar grid showing `anchor`'s month: from the
/// start of the week containing the 1st through the end of the week
/// containing the last day. Always a whole number of weeks; pure in
/// (anchor, week_start).
pub fn month_grid(anchor: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let first = first_of_month(anchor);
    let last = last_of_month(anchor);

    let lead = days_into_week(first.weekday(), week_start);
    let tail = 6 - days_into_week(last.weekday(), week_start);
    let grid_start = first - Duration::days(i64::from(lead));
    let grid_end = last + Duration::days(i64::from(tail));

    grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .collect()
}

/// Date-to-items index built in one pass so a 42-cell grid never
/// rescans the item list per cell.
#[derive(Debug, Clone, Default)]
pub struct DueIndex {
    by_day: HashMap<NaiveDate, Vec<Item>>,
}

impl DueIndex {
    pub fn build(items: &[Item]) -> Self {
        let mut by_day: HashMap<NaiveDate, Vec<Item>> = HashMap::new();
        for item in items {
            if let Some(due) = item.due_date {
                by_day.entry(due).or_default().push(item.clone());
            }
        }
        Self { by_day }
    }

    pub fn item_count(&self, date: NaiveDate) -> usize {
        self.by_day.get(&date).map_or(0, Vec::len)
    }

    pub fn has_items(&self, date: NaiveDate) -> bool {
        self.item_count(date) > 0
    }

    pub fn items_on(&self, date: NaiveDate) -> &[Item] {
        self.by_day.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Classification of the most urgent item due on `date`, or `None`
    /// when nothing is due.
    pub fn most_urgent(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        config: &CoreConfig,
    ) -> Option<DueStatus> {
        self.by_day
            .get(&date)?
            .iter()
            .map(|item| DueStatus::classify(item.due_date, today, config))
            .min_by_key(DueStatus::rank)
    }
}

/// One grid cell, precomputed for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub item_count: usize,
    pub most_urgent: Option<DueStatus>,
}

/// A whole month ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    /// First day of the displayed month.
    pub month: NaiveDate,
    pub days: Vec<CalendarDay>,
}

pub fn month_view(
    anchor: NaiveDate,
    items: &[Item],
    today: NaiveDate,
    config: &CoreConfig,
) -> MonthView {
    let month = first_of_month(anchor);
    let index = DueIndex::build(items);
    let days = month_grid(anchor, config.week_start)
        .into_iter()
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == month.month() && date.year() == month.year(),
            item_count: index.item_count(date),
            most_urgent: index.most_urgent(date, today, config),
        })
        .collect();
    MonthView { month, days }
}
