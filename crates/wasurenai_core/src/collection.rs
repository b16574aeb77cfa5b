use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::CoreConfig, due::DueStatus, group::Group, item::Item};

/// User-selectable ordering for a flat item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    DueDate,
    Priority,
    Name,
}

/// Items split into the urgent bucket and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgentSplit {
    /// Overdue, due today or due tomorrow; ordered most urgent first.
    pub urgent: Vec<Item>,
    /// Everything else, in input order.
    pub rest: Vec<Item>,
}

/// Items of one display bucket; `group` is `None` for the trailing
/// unassigned bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedItems {
    pub group: Option<Group>,
    pub items: Vec<Item>,
}

fn due_key(item: &Item, today: NaiveDate) -> NaiveDate {
    // A missing due date compares as "now", i.e. after anything overdue.
    item.due_date.unwrap_or(today)
}

/// Partition into urgent and non-urgent. The urgent bucket is sorted
/// by (status rank, due date, id); the rest keeps input order.
pub fn partition_urgent(items: &[Item], today: NaiveDate, config: &CoreConfig) -> UrgentSplit {
    let mut urgent = Vec::new();
    let mut rest = Vec::new();

    for item in items {
        if DueStatus::classify(item.due_date, today, config).is_urgent() {
            urgent.push(item.clone());
        } else {
            rest.push(item.clone());
        }
    }

    urgent.sort_by(|a, b| {
        let rank_a = DueStatus::classify(a.due_date, today, config).rank();
        let rank_b = DueStatus::classify(b.due_date, today, config).rank();
        rank_a
            .cmp(&rank_b)
            .then_with(|| due_key(a, today).cmp(&due_key(b, today)))
            .then_with(|| a.id.cmp(&b.id))
    });

    UrgentSplit { urgent, rest }
}

/// Bucket items by group, in group sort order, with a trailing
/// unassigned bucket collecting both unfiled items and dangling group
/// references. Buckets with no members are omitted; every input item
/// lands in exactly one bucket.
pub fn group_items(items: &[Item], groups: &[Group], today: NaiveDate) -> Vec<GroupedItems> {
    let known: HashSet<Uuid> = groups.iter().map(|group| group.id).collect();

    let mut by_group: HashMap<Uuid, Vec<Item>> = HashMap::new();
    let mut unassigned: Vec<Item> = Vec::new();
    for item in items {
        match item.group_id.filter(|id| known.contains(id)) {
            Some(id) => by_group.entry(id).or_default().push(item.clone()),
            None => unassigned.push(item.clone()),
        }
    }

    let mut ordered: Vec<&Group> = groups.iter().collect();
    ordered.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));

    let sort_bucket = |bucket: &mut Vec<Item>| {
        bucket.sort_by(|a, b| {
            due_key(a, today)
                .cmp(&due_key(b, today))
                .then_with(|| a.id.cmp(&b.id))
        });
    };

    let mut result = Vec::new();
    for group in ordered {
        if let Some(mut bucket) = by_group.remove(&group.id) {
            sort_bucket(&mut bucket);
            result.push(GroupedItems {
                group: Some(group.clone()),
                items: bucket,
            });
        }
    }
    if !unassigned.is_empty() {
        sort_bucket(&mut unassigned);
        result.push(GroupedItems {
            group: None,
            items: unassigned,
        });
    }
    result
}

/// Stable multi-key sort. Every mode ends on the item id so equal keys
/// order reproducibly regardless of fetch order.
pub fn sort_items(items: &mut [Item], option: SortOption, today: NaiveDate, config: &CoreConfig) {
    match option {
        SortOption::DueDate => items.sort_by(|a, b| {
            let rank_a = DueStatus::classify(a.due_date, today, config).rank();
            let rank_b = DueStatus::classify(b.due_date, today, config).rank();
            rank_a
                .cmp(&rank_b)
                .then_with(|| due_key(a, today).cmp(&due_key(b, today)))
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortOption::Priority => items.sort_by(|a, b| {
            a.priority
                .sort_rank()
                .cmp(&b.priority.sort_rank())
                .then_with(|| due_key(a, today).cmp(&due_key(b, today)))
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortOption::Name => items.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
    }
}

/// `None` keeps every item; `Some(id)` keeps members of that group.
pub fn filter_by_group(items: &[Item], group_id: Option<Uuid>) -> Vec<Item> {
    match group_id {
        None => items.to_vec(),
        Some(id) => items
            .iter()
            .filter(|item| item.group_id == Some(id))
            .cloned()
            .collect(),
    }
}

/// Case-insensitive substring match on the item name. An empty query
/// keeps everything.
pub fn search(items: &[Item], query: &str) -> Vec<Item> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
