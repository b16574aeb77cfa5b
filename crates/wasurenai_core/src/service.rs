use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    calendar::{self, MonthView},
    collection::{self, GroupedItems, SortOption},
    config::CoreConfig,
    error::ValidationError,
    group::{self, Group},
    history::{self, CompletionHistory, MonthHistories},
    item::{Item, ItemDraft},
    notify::{self, NotificationRequest, NotificationSink},
    recurrence::{self, Completion},
    store::{JsonStore, Snapshot},
};

/// The home screen: the urgent bucket on top, everything else bucketed
/// by group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub urgent: Vec<Item>,
    pub by_group: Vec<GroupedItems>,
}

impl HomeView {
    pub fn is_empty(&self) -> bool {
        self.urgent.is_empty() && self.by_group.is_empty()
    }

    pub fn urgent_count(&self) -> usize {
        self.urgent.len()
    }
}

/// Facade over the engines plus the persisted snapshot. Views are
/// recomputed per call; "today" is always a parameter so status is
/// never cached across days.
pub struct ReminderService {
    config: CoreConfig,
    state: RwLock<Snapshot>,
    store: Option<JsonStore>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

pub struct ReminderServiceBuilder {
    config: CoreConfig,
    store: Option<JsonStore>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

impl Default for ReminderServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderServiceBuilder {
    pub fn new() -> Self {
        Self {
            config: CoreConfig::default(),
            store: None,
            notification_sink: None,
        }
    }

    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_store(mut self, path: impl AsRef<Path>) -> Self {
        self.store = Some(JsonStore::open(path));
        self
    }

    pub fn with_notification_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    /// Loads the snapshot (store errors go back to the caller) and
    /// seeds the default groups when none exist yet.
    pub fn build(self) -> Result<ReminderService> {
        let mut snapshot = match &self.store {
            Some(store) => store.load()?,
            None => Snapshot::default(),
        };

        if snapshot.groups.is_empty() {
            snapshot.groups = group::default_groups();
            tracing::debug!(count = snapshot.groups.len(), "seeded default groups");
            if let Some(store) = &self.store {
                store.save(&snapshot)?;
            }
        }

        Ok(ReminderService {
            config: self.config,
            state: RwLock::new(snapshot),
            store: self.store,
            notification_sink: self.notification_sink,
        })
    }
}

impl ReminderService {
    pub fn builder() -> ReminderServiceBuilder {
        ReminderServiceBuilder::new()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Persist `next` before the caller swaps it in, so memory and disk
    /// only ever move together. Mutators call this while still holding
    /// the write lock; concurrent read-modify-write cycles therefore
    /// serialize instead of losing updates.
    fn persist(&self, next: &Snapshot) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(next)?;
        }
        Ok(())
    }

    fn sync_notification(&self, item: &Item) {
        if let Some(sink) = &self.notification_sink {
            sink.cancel_for_item(item.id);
            if let Some(request) = notify::plan_for_item(item, &self.config) {
                sink.schedule(request);
            }
        }
    }

    /// Drop in-memory state and re-read the stored snapshot.
    pub fn reload(&self) -> Result<()> {
        if let Some(store) = &self.store {
            let mut state = self.state.write();
            *state = store.load()?;
            tracing::debug!("reloaded snapshot from store");
        }
        Ok(())
    }

    // ---- items ---------------------------------------------------------

    pub fn items(&self) -> Vec<Item> {
        self.state.read().items.clone()
    }

    pub fn item(&self, id: Uuid) -> Result<Item> {
        self.state
            .read()
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownItem(id).into())
    }

    pub fn create_item(&self, draft: ItemDraft) -> Result<Item> {
        let item = Item::create(draft, &self.config)?;
        let mut state = self.state.write();
        let mut next = state.clone();
        next.items.push(item.clone());
        self.persist(&next)?;
        *state = next;
        drop(state);
        self.sync_notification(&item);
        tracing::debug!(%item.id, name = %item.name, "item created");
        Ok(item)
    }

    pub fn update_item(&self, id: Uuid, draft: ItemDraft) -> Result<Item> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let item = next
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ValidationError::UnknownItem(id))?;
        item.apply_draft(draft, &self.config)?;
        let updated = item.clone();
        self.persist(&next)?;
        *state = next;
        drop(state);
        self.sync_notification(&updated);
        Ok(updated)
    }

    /// Removes the item; its completion history stays untouched.
    pub fn delete_item(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let before = next.items.len();
        next.items.retain(|item| item.id != id);
        if next.items.len() == before {
            return Err(ValidationError::UnknownItem(id).into());
        }
        self.persist(&next)?;
        *state = next;
        drop(state);
        if let Some(sink) = &self.notification_sink {
            sink.cancel_for_item(id);
        }
        tracing::debug!(%id, "item deleted");
        Ok(())
    }

    pub fn complete_item(&self, id: Uuid, note: Option<String>) -> Result<Completion> {
        self.complete_item_at(id, Utc::now(), note)
    }

    /// Advance the item's due date and append the history record. Both
    /// effects land in one commit.
    pub fn complete_item_at(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<Completion> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let slot = next
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(ValidationError::UnknownItem(id))?;
        let completion = recurrence::complete(slot, completed_at, note)?;
        *slot = completion.item.clone();
        next.histories.push(completion.history.clone());
        self.persist(&next)?;
        *state = next;
        drop(state);
        self.sync_notification(&completion.item);
        tracing::debug!(%id, due = ?completion.item.due_date, "item completed");
        Ok(completion)
    }

    // ---- groups --------------------------------------------------------

    pub fn groups(&self) -> Vec<Group> {
        let mut groups = self.state.read().groups.clone();
        groups.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.id.cmp(&b.id)));
        groups
    }

    pub fn create_group(
        &self,
        name: impl Into<String>,
        color_hex: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Result<Group> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let sort_order = next
            .groups
            .iter()
            .map(|group| group.sort_order + 1)
            .max()
            .unwrap_or(0);
        let group = Group::new(name, color_hex, icon_name, sort_order)?;
        next.groups.push(group.clone());
        self.persist(&next)?;
        *state = next;
        Ok(group)
    }

    pub fn update_group(
        &self,
        id: Uuid,
        name: impl Into<String>,
        color_hex: impl Into<String>,
        icon_name: impl Into<String>,
    ) -> Result<Group> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyGroupName.into());
        }
        let mut state = self.state.write();
        let mut next = state.clone();
        let group = next
            .groups
            .iter_mut()
            .find(|group| group.id == id)
            .ok_or(ValidationError::UnknownGroup(id))?;
        group.name = name.trim().to_string();
        group.color_hex = color_hex.into();
        group.icon_name = icon_name.into();
        let updated = group.clone();
        self.persist(&next)?;
        *state = next;
        Ok(updated)
    }

    /// Renumber groups to match the given presentation order. The list
    /// must name every group exactly once; a partial list would leave
    /// the remainder colliding with the new numbering.
    pub fn reorder_groups(&self, ids: &[Uuid]) -> Result<()> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let unique: HashSet<Uuid> = ids.iter().copied().collect();
        if ids.len() != next.groups.len() || unique.len() != ids.len() {
            return Err(ValidationError::IncompleteReorder.into());
        }
        for (position, id) in ids.iter().enumerate() {
            let group = next
                .groups
                .iter_mut()
                .find(|group| group.id == *id)
                .ok_or(ValidationError::UnknownGroup(*id))?;
            group.sort_order = position as i32;
        }
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    /// Default groups are protected; members of a deleted group are
    /// orphaned, never cascaded.
    pub fn delete_group(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let group = next
            .groups
            .iter()
            .find(|group| group.id == id)
            .ok_or(ValidationError::UnknownGroup(id))?;
        if group.is_default {
            return Err(ValidationError::DefaultGroupProtected.into());
        }
        next.groups.retain(|group| group.id != id);
        for item in next.items.iter_mut() {
            if item.group_id == Some(id) {
                item.group_id = None;
            }
        }
        self.persist(&next)?;
        *state = next;
        tracing::debug!(%id, "group deleted, members orphaned");
        Ok(())
    }

    // ---- histories -----------------------------------------------------

    /// All completion records, newest first.
    pub fn histories(&self) -> Vec<CompletionHistory> {
        let mut histories = self.state.read().histories.clone();
        histories.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(a.id.cmp(&b.id)));
        histories
    }

    pub fn histories_by_month(&self) -> Vec<MonthHistories> {
        history::histories_by_month(&self.state.read().histories)
    }

    pub fn delete_history(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let mut next = state.clone();
        next.histories.retain(|history| history.id != id);
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    pub fn clear_histories(&self) -> Result<()> {
        let mut state = self.state.write();
        let mut next = state.clone();
        next.histories.clear();
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    // ---- views ---------------------------------------------------------

    pub fn home_view(&self, today: NaiveDate) -> HomeView {
        let state = self.state.read();
        let split = collection::partition_urgent(&state.items, today, &self.config);
        let by_group = collection::group_items(&split.rest, &state.groups, today);
        HomeView {
            urgent: split.urgent,
            by_group,
        }
    }

    /// Flat list: group filter, then search, then sort.
    pub fn sorted_items(
        &self,
        group_filter: Option<Uuid>,
        sort: SortOption,
        query: &str,
        today: NaiveDate,
    ) -> Vec<Item> {
        let state = self.state.read();
        let filtered = collection::filter_by_group(&state.items, group_filter);
        let mut matched = collection::search(&filtered, query);
        collection::sort_items(&mut matched, sort, today, &self.config);
        matched
    }

    pub fn calendar_view(&self, anchor: NaiveDate, today: NaiveDate) -> MonthView {
        calendar::month_view(anchor, &self.state.read().items, today, &self.config)
    }

    pub fn items_due_on(&self, date: NaiveDate) -> Vec<Item> {
        self.state
            .read()
            .items
            .iter()
            .filter(|item| item.due_date == Some(date))
            .cloned()
            .collect()
    }

    /// Reminder requests for every eligible item, for a notification
    /// collaborator to (re)schedule in bulk.
    pub fn notification_plans(&self) -> Vec<NotificationRequest> {
        self.state
            .read()
            .items
            .iter()
            .filter_map(|item| notify::plan_for_item(item, &self.config))
            .collect()
    }
}
