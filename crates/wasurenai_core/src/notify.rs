use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::CoreConfig, item::Item};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub item_id: Uuid,
    pub title: String,
    pub body: String,
    pub scheduled_for: DateTime<Utc>,
}

/// Platform-specific notification adapters implement this trait. The
/// core only plans requests; delivery stays outside.
pub trait NotificationSink: Send + Sync {
    fn schedule(&self, request: NotificationRequest);
    fn cancel_for_item(&self, item_id: Uuid);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn schedule(&self, request: NotificationRequest) {
        (**self).schedule(request);
    }

    fn cancel_for_item(&self, item_id: Uuid) {
        (**self).cancel_for_item(item_id);
    }
}

/// Reminder for one item, or `None` when reminders are disabled or no
/// due date is set. `notify_before_days == 0` means the due day itself.
pub fn plan_for_item(item: &Item, config: &CoreConfig) -> Option<NotificationRequest> {
    if !item.notify_enabled {
        return None;
    }
    let due = item.due_date?;
    let fire_date = due.checked_sub_days(Days::new(u64::from(item.notify_before_days)))?;
    let fire_time =
        NaiveTime::from_hms_opt(config.notification_hour, config.notification_minute, 0)?;
    Some(NotificationRequest {
        item_id: item.id,
        title: format!("交換リマインド: {}", item.name),
        body: format!("期日: {}", due.format("%Y-%m-%d")),
        scheduled_for: Utc.from_utc_datetime(&fire_date.and_time(fire_time)),
    })
}
