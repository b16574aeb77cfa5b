pub mod calendar;
pub mod collection;
pub mod config;
pub mod due;
pub mod error;
pub mod group;
pub mod history;
pub mod item;
pub mod notify;
pub mod recurrence;
pub mod service;
pub mod store;

pub use crate::service::{ReminderService, ReminderServiceBuilder};
