//! # Persistence Coordinator
//!
//! [`PluginDataIo`] keeps three things in step: the settings registry, the
//! in-memory reminder store, and the two storage regions behind a
//! [`StorageBackend`].
//!
//! ## Lifecycle
//!
//! ```text
//! new() ──► Restoring ──(first successful load)──► Ready
//! ```
//!
//! Construction subscribes one change listener per setting and enters
//! [`Phase::Restoring`]. The first successful [`PluginDataIo::load`] moves to
//! [`Phase::Ready`], also when no durable blob exists yet (fresh install). A
//! failed load leaves the phase untouched so the host can retry.
//!
//! ## Dirty Tracking
//!
//! Each setting listener, once `Ready`:
//! 1. clears `scanned` if the setting carries [`TAG_RESCAN`]; the reminders
//!    extracted under the old value may be stale,
//! 2. marks the coordinator changed.
//!
//! While `Restoring` the listener does nothing. Settings also load through a
//! silent path, so restoring never looks like a user edit either way.
//!
//! ## Load
//!
//! 1. Read the durable blob. Absent: `scanned = false`, done.
//! 2. Apply `scanned`, `debug` (only when present) and every setting.
//! 3. Read the reminder cache from the fast region. When the item is missing,
//!    fall back to rows carried in the durable blob, if any.
//! 4. Rebuild each file's reminders (restored, not generated) and swap them in
//!    with `replace_file`.
//! 5. Clear the changed flag.
//!
//! A corrupt cache is a [`RemindzError::CorruptCache`]; nothing is patched locally.
//!
//! ## Save
//!
//! Skipped unless forced or changed. Writes the reminder cache to the fast
//! region, then `{scanned, debug, settings}` to the durable region. The changed
//! flag is cleared only after both writes succeed, so a failed save is retried
//! by the next one.
//!
//! `load` and `save` take `&mut self`: overlapping saves cannot be expressed.

use crate::data::{cache_from_reminders, PluginData, ReminderCache};
use crate::error::{RemindzError, Result};
use crate::model::{Reminder, Reminders};
use crate::observable::Observable;
use crate::settings::{SettingsRegistry, TAG_RESCAN};
use crate::store::{StorageBackend, REMINDERS_CACHE_KEY};
use crate::time::ReminderTime;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Restoring,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceOptions {
    /// Fast-region key of the reminder cache.
    pub cache_key: String,
    /// Also write reminder rows into the durable blob.
    pub mirror_to_durable: bool,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            cache_key: REMINDERS_CACHE_KEY.to_string(),
            mirror_to_durable: false,
        }
    }
}

/// Shared with the setting listeners.
#[derive(Debug)]
struct DirtyState {
    phase: Cell<Phase>,
    changed: Cell<bool>,
}

pub struct PluginDataIo<B: StorageBackend> {
    backend: B,
    settings: Rc<SettingsRegistry>,
    reminders: Rc<RefCell<Reminders>>,
    state: Rc<DirtyState>,
    scanned: Rc<Observable<bool>>,
    debug: Rc<Observable<bool>>,
    options: PersistenceOptions,
}

impl<B: StorageBackend> PluginDataIo<B> {
    pub fn new(
        backend: B,
        settings: Rc<SettingsRegistry>,
        reminders: Rc<RefCell<Reminders>>,
    ) -> Self {
        let state = Rc::new(DirtyState {
            phase: Cell::new(Phase::Restoring),
            changed: Cell::new(false),
        });
        let scanned = Rc::new(Observable::new(false));

        for setting in settings.iter() {
            let rescan = setting.has_tag(TAG_RESCAN);
            let key = setting.key().to_string();
            let state = state.clone();
            let scanned = scanned.clone();
            setting.on_changed(Box::new(move || {
                if state.phase.get() == Phase::Restoring {
                    return;
                }
                if rescan {
                    log::debug!("Setting '{}' changed, reminders need a rescan", key);
                    scanned.set(false);
                }
                state.changed.set(true);
            }));
        }

        Self {
            backend,
            settings,
            reminders,
            state,
            scanned,
            debug: Rc::new(Observable::new(false)),
            options: PersistenceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PersistenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn load(&mut self) -> Result<()> {
        log::debug!("Load reminder plugin data");
        self.restore()?;
        self.state.changed.set(false);
        if self.state.phase.get() == Phase::Restoring {
            self.state.phase.set(Phase::Ready);
        }
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        let Some(data) = self.backend.load_data()? else {
            log::debug!("No stored plugin data, starting fresh");
            self.scanned.set(false);
            return Ok(());
        };

        self.scanned.set(data.scanned);
        if let Some(debug) = data.debug {
            self.debug.set(debug);
        }
        self.settings.load_all(&data.settings);

        let cache = match self.read_cache()? {
            Some(cache) => cache,
            None => match data.reminders {
                Some(rows) => {
                    log::info!("Reminder cache missing, restoring rows from plugin data");
                    rows
                }
                None => ReminderCache::new(),
            },
        };
        self.apply_cache(cache)
    }

    fn read_cache(&self) -> Result<Option<ReminderCache>> {
        let Some(raw) = self.backend.get_item(&self.options.cache_key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let cache: Option<ReminderCache> =
            serde_json::from_str(&raw).map_err(RemindzError::CorruptCache)?;
        Ok(cache)
    }

    /// Parse every row before touching the store, so a bad row leaves it as it was.
    fn apply_cache(&self, cache: ReminderCache) -> Result<()> {
        let mut files = Vec::with_capacity(cache.len());
        for (file, rows) in cache {
            let Some(rows) = rows else {
                log::debug!("Skipping cache entry without rows: {}", file);
                continue;
            };
            let restored = rows
                .into_iter()
                .map(|row| -> Result<Reminder> {
                    let time = ReminderTime::parse(&row.time)?;
                    Ok(Reminder::restored(
                        file.as_str(),
                        row.title,
                        time,
                        row.row_number,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            files.push((file, restored));
        }

        let mut reminders = self.reminders.borrow_mut();
        for (file, restored) in files {
            reminders.replace_file(file, restored);
        }
        Ok(())
    }

    /// Persist both regions if forced or changed. Returns whether anything was written.
    pub fn save(&mut self, force: bool) -> Result<bool> {
        let changed = self.state.changed.get();
        if !force && !changed {
            return Ok(false);
        }
        log::debug!(
            "Save reminder plugin data: force={}, changed={}",
            force,
            changed
        );

        let cache = cache_from_reminders(&self.reminders.borrow());
        let encoded = serde_json::to_string(&cache)?;
        self.backend.set_item(&self.options.cache_key, &encoded)?;

        let data = PluginData {
            scanned: self.scanned.get(),
            debug: Some(self.debug.get()),
            settings: self.settings.store_all(),
            reminders: self.options.mirror_to_durable.then_some(cache),
        };
        self.backend.save_data(&data)?;

        self.state.changed.set(false);
        Ok(true)
    }

    /// Drop the fast-region reminder cache.
    pub fn discard_cache(&self) -> Result<()> {
        log::warn!("Discarding reminder cache '{}'", self.options.cache_key);
        self.backend.remove_item(&self.options.cache_key)
    }

    /// Swap in a file's reminders after a scan and mark the store changed.
    pub fn replace_file(&self, file: impl Into<String>, reminders: Vec<Reminder>) {
        self.reminders.borrow_mut().replace_file(file, reminders);
        self.mark_changed();
    }

    /// Record that a full document scan completed.
    pub fn mark_scanned(&self) {
        if self.scanned.set(true) {
            self.mark_changed();
        }
    }

    pub fn set_debug(&self, enabled: bool) {
        if self.debug.set(enabled) {
            self.mark_changed();
        }
    }

    pub fn mark_changed(&self) {
        self.state.changed.set(true);
    }

    pub fn phase(&self) -> Phase {
        self.state.phase.get()
    }

    pub fn is_restoring(&self) -> bool {
        self.phase() == Phase::Restoring
    }

    pub fn is_changed(&self) -> bool {
        self.state.changed.get()
    }

    pub fn scanned(&self) -> bool {
        self.scanned.get()
    }

    pub fn debug(&self) -> bool {
        self.debug.get()
    }

    pub fn reminders(&self) -> Rc<RefCell<Reminders>> {
        self.reminders.clone()
    }

    pub fn settings(&self) -> &SettingsRegistry {
        &self.settings
    }

    pub fn options(&self) -> &PersistenceOptions {
        &self.options
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ReminderSettings;
    use crate::store::mem_backend::MemBackend;

    struct Fixture {
        io: PluginDataIo<MemBackend>,
        settings: ReminderSettings,
        reminders: Rc<RefCell<Reminders>>,
    }

    fn fixture(backend: MemBackend) -> Fixture {
        let settings = ReminderSettings::new();
        let reminders = Rc::new(RefCell::new(Reminders::new()));
        let io = PluginDataIo::new(backend, Rc::new(settings.registry()), reminders.clone());
        Fixture {
            io,
            settings,
            reminders,
        }
    }

    fn ready(backend: MemBackend) -> Fixture {
        let mut f = fixture(backend);
        f.io.load().unwrap();
        f
    }

    fn reminder(file: &str, title: &str, time: &str, row: usize) -> Reminder {
        Reminder::generated(file, title, ReminderTime::parse(time).unwrap(), row)
    }

    #[test]
    fn test_new_coordinator_is_restoring() {
        let f = fixture(MemBackend::new());
        assert_eq!(f.io.phase(), Phase::Restoring);
        assert!(!f.io.is_changed());
    }

    #[test]
    fn test_first_load_without_blob_starts_fresh() {
        let f = ready(MemBackend::new());
        assert!(!f.io.scanned());
        assert!(f.reminders.borrow().is_empty());
        assert_eq!(f.io.phase(), Phase::Ready);
        assert!(!f.io.is_changed());
    }

    #[test]
    fn test_edits_while_restoring_are_not_tracked() {
        let mut f = fixture(MemBackend::new().with_data_json(r#"{"scanned": true}"#));
        f.settings.date_format.set_value("DD.MM.YYYY".to_string());
        assert!(!f.io.is_changed());

        f.io.load().unwrap();
        assert!(f.io.scanned());
        assert!(!f.io.is_changed());
    }

    #[test]
    fn test_loading_settings_does_not_mark_changed_or_clear_scanned() {
        let backend = MemBackend::new().with_data_json(
            r#"{"scanned": true, "settings": {"dateFormat": "DD/MM/YYYY", "reminderTime": "07:00"}}"#,
        );
        let f = ready(backend);

        assert_eq!(f.settings.date_format.value(), "DD/MM/YYYY");
        assert_eq!(f.settings.reminder_time.value(), "07:00");
        assert!(f.io.scanned());
        assert!(!f.io.is_changed());
    }

    #[test]
    fn test_rescan_tagged_edit_clears_scanned() {
        let f = ready(MemBackend::new().with_data_json(r#"{"scanned": true}"#));

        f.settings.strict_date_format.set_value(true);
        assert!(!f.io.scanned());
        assert!(f.io.is_changed());
    }

    #[test]
    fn test_untagged_edit_keeps_scanned() {
        let f = ready(MemBackend::new().with_data_json(r#"{"scanned": true}"#));

        f.settings.reminder_time.set_value("10:00".to_string());
        assert!(f.io.scanned());
        assert!(f.io.is_changed());
    }

    #[test]
    fn test_blob_without_debug_keeps_default() {
        let backend =
            MemBackend::new().with_data_json(r#"{"scanned": true, "debug": null, "settings": {}}"#);
        let mut f = fixture(backend);
        f.io.set_debug(true);
        f.io.load().unwrap();

        assert!(f.io.scanned());
        assert!(f.io.debug());
        assert!(f.reminders.borrow().is_empty());
        assert!(!f.io.is_changed());
    }

    #[test]
    fn test_load_restores_cached_reminders() {
        let backend = MemBackend::new()
            .with_data_json(r#"{"scanned": true, "settings": {}}"#)
            .with_item(
                "reminders",
                r#"{"noteA.md": [{"title": "Buy milk", "time": "2024-01-01T09:00", "rowNumber": 3}]}"#,
            );
        let f = ready(backend);

        let store = f.reminders.borrow();
        let restored = store.by_file("noteA.md");
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].title, "Buy milk");
        assert_eq!(restored[0].row_number, 3);
        assert_eq!(restored[0].time.to_string(), "2024-01-01T09:00");
        assert!(!restored[0].generated);
    }

    #[test]
    fn test_repeated_load_does_not_duplicate() {
        let backend = MemBackend::new()
            .with_data_json(r#"{"scanned": true}"#)
            .with_item(
                "reminders",
                r#"{"a.md": [{"title": "x", "time": "2024-01-01", "rowNumber": 1}]}"#,
            );
        let mut f = ready(backend);
        f.io.load().unwrap();

        assert_eq!(f.reminders.borrow().len(), 1);
    }

    #[test]
    fn test_null_rows_are_skipped() {
        let backend = MemBackend::new()
            .with_data_json(r#"{"scanned": true}"#)
            .with_item(
                "reminders",
                r#"{"a.md": null, "b.md": [{"title": "y", "time": "2024-02-02", "rowNumber": 2}]}"#,
            );
        let f = ready(backend);

        let store = f.reminders.borrow();
        assert!(store.by_file("a.md").is_empty());
        assert_eq!(store.by_file("b.md").len(), 1);
    }

    #[test]
    fn test_corrupt_cache_fails_load_and_stays_restoring() {
        let backend = MemBackend::new()
            .with_data_json(r#"{"scanned": true}"#)
            .with_item("reminders", "{not json");
        let mut f = fixture(backend);

        let err = f.io.load().unwrap_err();
        assert!(matches!(err, RemindzError::CorruptCache(_)));
        assert_eq!(f.io.phase(), Phase::Restoring);

        f.io.discard_cache().unwrap();
        f.io.load().unwrap();
        assert_eq!(f.io.phase(), Phase::Ready);
    }

    #[test]
    fn test_bad_time_leaves_store_untouched() {
        let backend = MemBackend::new()
            .with_data_json(r#"{"scanned": true}"#)
            .with_item(
                "reminders",
                r#"{"a.md": [{"title": "ok", "time": "2024-01-01", "rowNumber": 1}],
                    "b.md": [{"title": "bad", "time": "someday", "rowNumber": 1}]}"#,
            );
        let mut f = fixture(backend);

        let err = f.io.load().unwrap_err();
        assert!(matches!(err, RemindzError::InvalidTime(_)));
        assert!(f.reminders.borrow().is_empty());
    }

    #[test]
    fn test_save_round_trip() {
        let mut f = ready(MemBackend::new());
        f.io.replace_file(
            "a.md",
            vec![
                reminder("a.md", "first", "2024-01-01T09:00", 1),
                reminder("a.md", "second", "2024-01-02", 7),
            ],
        );
        f.io.replace_file("b.md", vec![reminder("b.md", "third", "2024-03-03", 2)]);
        f.settings.date_format.set_value("DD/MM/YYYY".to_string());
        f.io.mark_scanned();
        assert!(f.io.save(false).unwrap());

        let expected = f.reminders.borrow().clone();
        let backend = f.io.into_backend();
        let g = ready(backend);

        let restored = g.reminders.borrow();
        assert_eq!(restored.file_count(), expected.file_count());
        for (file, list) in expected.file_to_reminders() {
            let got = restored.by_file(file);
            assert_eq!(got.len(), list.len());
            for (a, b) in got.iter().zip(list) {
                assert_eq!(a.file, b.file);
                assert_eq!(a.title, b.title);
                assert_eq!(a.time, b.time);
                assert_eq!(a.row_number, b.row_number);
                assert!(!a.generated);
            }
        }
        assert_eq!(g.settings.date_format.value(), "DD/MM/YYYY");
        assert!(g.io.scanned());
    }

    #[test]
    fn test_second_save_without_changes_is_a_no_op() {
        let mut f = ready(MemBackend::new());
        f.settings.reminder_time.set_value("08:00".to_string());

        assert!(f.io.save(false).unwrap());
        assert!(!f.io.save(false).unwrap());
        assert_eq!(f.io.backend().durable_write_count(), 1);
        assert_eq!(f.io.backend().cache_write_count(), 1);
    }

    #[test]
    fn test_forced_save_writes_when_unchanged() {
        let mut f = ready(MemBackend::new());
        assert!(!f.io.is_changed());

        assert!(f.io.save(true).unwrap());
        assert_eq!(f.io.backend().durable_write_count(), 1);
        assert_eq!(f.io.backend().cache_write_count(), 1);
    }

    #[test]
    fn test_failed_cache_write_keeps_changed() {
        let mut f = ready(MemBackend::new());
        f.io.mark_changed();
        f.io.backend().set_simulate_cache_write_error(true);

        assert!(f.io.save(false).is_err());
        assert!(f.io.is_changed());
        assert_eq!(f.io.backend().durable_write_count(), 0);

        f.io.backend().set_simulate_cache_write_error(false);
        assert!(f.io.save(false).unwrap());
        assert!(!f.io.is_changed());
    }

    #[test]
    fn test_failed_durable_write_keeps_changed() {
        let mut f = ready(MemBackend::new());
        f.io.mark_changed();
        f.io.backend().set_simulate_durable_write_error(true);

        assert!(f.io.save(false).is_err());
        assert!(f.io.is_changed());
    }

    #[test]
    fn test_saved_blob_shape() {
        let mut f = ready(MemBackend::new());
        f.io.set_debug(true);
        f.io.save(false).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&f.io.backend().data_json().unwrap()).unwrap();
        assert_eq!(json["scanned"], serde_json::json!(false));
        assert_eq!(json["debug"], serde_json::json!(true));
        assert_eq!(json["settings"]["autoCompleteTrigger"], serde_json::json!("(@"));
        assert!(json.get("reminders").is_none());
    }

    #[test]
    fn test_mirrored_rows_survive_cache_loss() {
        let settings = ReminderSettings::new();
        let reminders = Rc::new(RefCell::new(Reminders::new()));
        let mut io = PluginDataIo::new(MemBackend::new(), Rc::new(settings.registry()), reminders)
            .with_options(PersistenceOptions {
                mirror_to_durable: true,
                ..Default::default()
            });
        io.load().unwrap();
        io.replace_file("a.md", vec![reminder("a.md", "kept", "2024-04-04", 9)]);
        io.save(false).unwrap();

        let backend = io.into_backend();
        backend.clear_items();
        let g = ready(backend);

        let store = g.reminders.borrow();
        assert_eq!(store.by_file("a.md")[0].title, "kept");
        assert_eq!(store.by_file("a.md")[0].row_number, 9);
    }

    #[test]
    fn test_custom_cache_key() {
        let settings = ReminderSettings::new();
        let reminders = Rc::new(RefCell::new(Reminders::new()));
        let mut io = PluginDataIo::new(MemBackend::new(), Rc::new(settings.registry()), reminders)
            .with_options(PersistenceOptions {
                cache_key: "vault-reminders".to_string(),
                ..Default::default()
            });
        io.load().unwrap();
        io.save(true).unwrap();

        assert!(io.backend().get_item("vault-reminders").unwrap().is_some());
        assert!(io.backend().get_item("reminders").unwrap().is_none());
    }
}
