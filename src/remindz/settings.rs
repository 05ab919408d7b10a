//! # Tagged Settings
//!
//! A setting is one [`Observable`] value plus a key and a set of tags. Tags
//! classify what changing the value means for the rest of the system; the only
//! tag the persistence core acts on is [`TAG_RESCAN`], which marks settings
//! whose change invalidates previously extracted reminders.
//!
//! Settings travel in a flat [`SettingsBlob`] (key → JSON primitive):
//! - [`Setting::load`] reads the setting's key from the blob, if present, and
//!   stores it through the silent path. Loading never notifies listeners, and
//!   loading the same blob twice yields the same value.
//! - [`Setting::store`] writes the current value under the setting's key.
//!
//! Absent keys leave the current (default) value in place. A stored value of
//! the wrong type is skipped with a warning.
//!
//! ## Registry
//!
//! [`SettingsRegistry`] is the ordered, enumerable collection the persistence
//! coordinator walks. It is built explicitly and handed to the coordinator; there
//! is no process-wide registry. [`ReminderSettings`] is the concrete catalogue,
//! with typed handles for code that needs the values.

use crate::error::{RemindzError, Result};
use crate::observable::Observable;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Settings whose change requires a full rescan of the documents.
pub const TAG_RESCAN: &str = "re-scan";

pub type SettingsBlob = serde_json::Map<String, serde_json::Value>;

/// Object-safe view of a tagged setting, independent of its value type.
pub trait Setting {
    fn key(&self) -> &str;

    fn tags(&self) -> Vec<&str>;

    fn has_tag(&self, tag: &str) -> bool;

    /// Read this setting from `blob` without notifying listeners.
    fn load(&self, blob: &SettingsBlob);

    /// Write the current value into `blob`.
    fn store(&self, blob: &mut SettingsBlob);

    /// Subscribe to changes of the underlying value.
    fn on_changed(&self, listener: Box<dyn Fn()>);

    fn display_value(&self) -> String;

    /// Parse `raw` and assign it through the notifying path.
    /// Returns whether the value changed.
    fn set_from_str(&self, raw: &str) -> Result<bool>;
}

pub struct TaggedSetting<T> {
    key: String,
    tags: BTreeSet<String>,
    raw_value: Rc<Observable<T>>,
}

impl<T: Clone + PartialEq> TaggedSetting<T> {
    pub fn new(key: impl Into<String>, default: T) -> Self {
        Self {
            key: key.into(),
            tags: BTreeSet::new(),
            raw_value: Rc::new(Observable::new(default)),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn raw_value(&self) -> Rc<Observable<T>> {
        self.raw_value.clone()
    }

    pub fn value(&self) -> T {
        self.raw_value.get()
    }

    pub fn set_value(&self, value: T) -> bool {
        self.raw_value.set(value)
    }
}

impl<T> Setting for TaggedSetting<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned + FromStr + fmt::Display + 'static,
    T::Err: fmt::Display,
{
    fn key(&self) -> &str {
        &self.key
    }

    fn tags(&self) -> Vec<&str> {
        self.tags.iter().map(String::as_str).collect()
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    fn load(&self, blob: &SettingsBlob) {
        let Some(raw) = blob.get(&self.key) else {
            return;
        };
        match serde_json::from_value::<T>(raw.clone()) {
            Ok(value) => self.raw_value.replace_silently(value),
            Err(e) => log::warn!("Ignoring stored value for setting '{}': {}", self.key, e),
        }
    }

    fn store(&self, blob: &mut SettingsBlob) {
        match serde_json::to_value(self.raw_value.get()) {
            Ok(value) => {
                blob.insert(self.key.clone(), value);
            }
            Err(e) => log::warn!("Could not serialize setting '{}': {}", self.key, e),
        }
    }

    fn on_changed(&self, listener: Box<dyn Fn()>) {
        self.raw_value.on_changed(listener);
    }

    fn display_value(&self) -> String {
        self.raw_value.get().to_string()
    }

    fn set_from_str(&self, raw: &str) -> Result<bool> {
        let value = raw
            .parse::<T>()
            .map_err(|e| RemindzError::InvalidSetting {
                key: self.key.clone(),
                reason: e.to_string(),
            })?;
        Ok(self.raw_value.set(value))
    }
}

impl<T: fmt::Debug> fmt::Debug for TaggedSetting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedSetting")
            .field("key", &self.key)
            .field("tags", &self.tags)
            .field("raw_value", &self.raw_value)
            .finish()
    }
}

/// Ordered collection of settings, in registration order.
#[derive(Default)]
pub struct SettingsRegistry {
    settings: Vec<Rc<dyn Setting>>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: Setting + 'static>(&mut self, setting: Rc<S>) {
        self.settings.push(setting);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn Setting>> {
        self.settings.iter()
    }

    pub fn find(&self, key: &str) -> Option<&Rc<dyn Setting>> {
        self.settings.iter().find(|s| s.key() == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.settings.iter().map(|s| s.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub fn load_all(&self, blob: &SettingsBlob) {
        for setting in &self.settings {
            setting.load(blob);
        }
    }

    pub fn store_all(&self) -> SettingsBlob {
        let mut blob = SettingsBlob::new();
        for setting in &self.settings {
            setting.store(&mut blob);
        }
        blob
    }
}

impl fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// The reminder settings catalogue.
#[derive(Debug)]
pub struct ReminderSettings {
    /// Default time of day for date-only reminders.
    pub reminder_time: Rc<TaggedSetting<String>>,
    pub date_format: Rc<TaggedSetting<String>>,
    pub date_time_format: Rc<TaggedSetting<String>>,
    pub strict_date_format: Rc<TaggedSetting<bool>>,
    pub use_system_notification: Rc<TaggedSetting<bool>>,
    pub auto_complete_trigger: Rc<TaggedSetting<String>>,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderSettings {
    pub fn new() -> Self {
        Self {
            reminder_time: Rc::new(TaggedSetting::new("reminderTime", "09:00".to_string())),
            date_format: Rc::new(
                TaggedSetting::new("dateFormat", "YYYY-MM-DD".to_string()).with_tag(TAG_RESCAN),
            ),
            date_time_format: Rc::new(
                TaggedSetting::new("dateTimeFormat", "YYYY-MM-DD HH:mm".to_string())
                    .with_tag(TAG_RESCAN),
            ),
            strict_date_format: Rc::new(
                TaggedSetting::new("strictDateFormat", false).with_tag(TAG_RESCAN),
            ),
            use_system_notification: Rc::new(TaggedSetting::new("useSystemNotification", false)),
            auto_complete_trigger: Rc::new(TaggedSetting::new(
                "autoCompleteTrigger",
                "(@".to_string(),
            )),
        }
    }

    pub fn registry(&self) -> SettingsRegistry {
        let mut registry = SettingsRegistry::new();
        registry.register(self.reminder_time.clone());
        registry.register(self.date_format.clone());
        registry.register(self.date_time_format.clone());
        registry.register(self.strict_date_format.clone());
        registry.register(self.use_system_notification.clone());
        registry.register(self.auto_complete_trigger.clone());
        registry
    }
}
