//! Condensed summary for the home-screen widget.
//!
//! Built strictly on `wasurenai_core`'s classifier and urgent-bucket
//! extraction: widget and main app can never disagree on which items
//! are overdue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wasurenai_core::{
    collection, config::CoreConfig, due::DueStatus, group::Group, item::Item,
};

/// One row of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetItem {
    pub id: Uuid,
    pub name: String,
    pub icon_name: Option<String>,
    pub group_name: Option<String>,
    pub group_color: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: DueStatus,
}

/// A rendered widget refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetEntry {
    pub generated_for: NaiveDate,
    pub items: Vec<WidgetItem>,
    pub has_urgent: bool,
}

impl WidgetEntry {
    /// Urgent items first (most urgent on top), padded with the
    /// soonest non-urgent items up to `limit`.
    pub fn build(
        items: &[Item],
        groups: &[Group],
        today: NaiveDate,
        config: &CoreConfig,
        limit: usize,
    ) -> Self {
        let split = collection::partition_urgent(items, today, config);
        let has_urgent = !split.urgent.is_empty();

        let mut rest = split.rest;
        rest.sort_by(|a, b| {
            a.due_date
                .unwrap_or(today)
                .cmp(&b.due_date.unwrap_or(today))
                .then(a.id.cmp(&b.id))
        });

        let rows = split
            .urgent
            .iter()
            .chain(rest.iter())
            .take(limit)
            .map(|item| widget_item(item, groups, today, config))
            .collect();

        Self {
            generated_for: today,
            items: rows,
            has_urgent,
        }
    }
}

fn widget_item(item: &Item, groups: &[Group], today: NaiveDate, config: &CoreConfig) -> WidgetItem {
    let group = item
        .group_id
        .and_then(|id| groups.iter().find(|group| group.id == id));
    WidgetItem {
        id: item.id,
        name: item.name.clone(),
        icon_name: item.icon_name.clone(),
        group_name: group.map(|group| group.name.clone()),
        group_color: group.map(|group| group.color_hex.clone()),
        due_date: item.due_date,
        status: DueStatus::classify(item.due_date, today, config),
    }
}
