//! Serialized shapes for the two storage regions.
//!
//! Durable blob (`data.json`):
//!
//! ```json
//! { "scanned": true, "debug": false, "settings": { "dateFormat": "YYYY-MM-DD" } }
//! ```
//!
//! `reminders` is optional in the durable blob; it is only written when rows are
//! mirrored there and is read back when the fast-tier cache is missing.
//!
//! Fast-tier cache (item `reminders`):
//!
//! ```json
//! { "noteA.md": [ { "title": "Buy milk", "time": "2024-01-01T09:00", "rowNumber": 3 } ] }
//! ```
//!
//! A `null` row array is tolerated and skipped on load.

use crate::model::{Reminder, Reminders};
use crate::settings::SettingsBlob;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRow {
    pub title: String,
    pub time: String,
    #[serde(rename = "rowNumber")]
    pub row_number: usize,
}

impl From<&Reminder> for ReminderRow {
    fn from(reminder: &Reminder) -> Self {
        Self {
            title: reminder.title.clone(),
            time: reminder.time.to_string(),
            row_number: reminder.row_number,
        }
    }
}

/// File identifier → rows. `None` marks an entry that carries no rows.
pub type ReminderCache = BTreeMap<String, Option<Vec<ReminderRow>>>;

/// Flatten the store into cache rows.
pub fn cache_from_reminders(reminders: &Reminders) -> ReminderCache {
    reminders
        .file_to_reminders()
        .iter()
        .map(|(file, list)| {
            let rows = list.iter().map(ReminderRow::from).collect();
            (file.clone(), Some(rows))
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginData {
    #[serde(default)]
    pub scanned: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(default)]
    pub settings: SettingsBlob,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<ReminderCache>,
}
