use crate::commands::{CmdMessage, CmdResult, SettingEntry};
use crate::error::{RemindzError, Result};
use crate::persistence::PluginDataIo;
use crate::settings::{Setting, TAG_RESCAN};
use crate::store::StorageBackend;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

fn entry(setting: &dyn Setting) -> SettingEntry {
    SettingEntry {
        key: setting.key().to_string(),
        value: setting.display_value(),
        tags: setting.tags().into_iter().map(String::from).collect(),
    }
}

pub fn run<B: StorageBackend>(io: &PluginDataIo<B>, action: ConfigAction) -> Result<CmdResult> {
    let settings = io.settings();
    match action {
        ConfigAction::ShowAll => {
            let entries = settings.iter().map(|s| entry(s.as_ref())).collect();
            Ok(CmdResult::default().with_settings(entries))
        }
        ConfigAction::ShowKey(key) => {
            let setting = settings
                .find(&key)
                .ok_or_else(|| RemindzError::UnknownSetting(key.clone()))?;
            Ok(CmdResult::default().with_settings(vec![entry(setting.as_ref())]))
        }
        ConfigAction::Set(key, value) => {
            let setting = settings
                .find(&key)
                .ok_or_else(|| RemindzError::UnknownSetting(key.clone()))?;
            let was_scanned = io.scanned();
            let changed = setting.set_from_str(&value)?;

            let mut result = CmdResult::default().with_settings(vec![entry(setting.as_ref())]);
            if !changed {
                result.add_message(CmdMessage::info(format!(
                    "{} is already {}",
                    key,
                    setting.display_value()
                )));
                return Ok(result);
            }
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key,
                setting.display_value()
            )));
            if setting.has_tag(TAG_RESCAN) && was_scanned && !io.scanned() {
                result.add_message(CmdMessage::warning(
                    "Cached reminders may be stale; a rescan of the documents is needed",
                ));
            }
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reminders;
    use crate::settings::ReminderSettings;
    use crate::store::mem_backend::MemBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn io() -> PluginDataIo<MemBackend> {
        let settings = ReminderSettings::new();
        let mut io = PluginDataIo::new(
            MemBackend::new().with_data_json(r#"{"scanned": true}"#),
            Rc::new(settings.registry()),
            Rc::new(RefCell::new(Reminders::new())),
        );
        io.load().unwrap();
        io
    }

    #[test]
    fn test_show_all() {
        let result = run(&io(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.settings.len(), 6);
        let date_format = result
            .settings
            .iter()
            .find(|s| s.key == "dateFormat")
            .unwrap();
        assert_eq!(date_format.value, "YYYY-MM-DD");
        assert_eq!(date_format.tags, vec![TAG_RESCAN.to_string()]);
    }

    #[test]
    fn test_show_unknown_key() {
        let err = run(&io(), ConfigAction::ShowKey("nope".into())).unwrap_err();
        assert!(matches!(err, RemindzError::UnknownSetting(_)));
    }

    #[test]
    fn test_set_rescan_setting_warns() {
        let io = io();
        let result = run(
            &io,
            ConfigAction::Set("strictDateFormat".into(), "true".into()),
        )
        .unwrap();

        assert_eq!(result.settings[0].value, "true");
        assert_eq!(result.messages.len(), 2);
        assert!(!io.scanned());
        assert!(io.is_changed());
    }

    #[test]
    fn test_set_plain_setting() {
        let io = io();
        let result = run(&io, ConfigAction::Set("reminderTime".into(), "06:45".into())).unwrap();

        assert_eq!(result.messages.len(), 1);
        assert!(io.scanned());
        assert!(io.is_changed());
    }

    #[test]
    fn test_set_same_value_is_not_a_change() {
        let io = io();
        run(&io, ConfigAction::Set("reminderTime".into(), "09:00".into())).unwrap();
        assert!(!io.is_changed());
    }

    #[test]
    fn test_set_invalid_value() {
        let io = io();
        let err = run(
            &io,
            ConfigAction::Set("useSystemNotification".into(), "perhaps".into()),
        )
        .unwrap_err();
        assert!(matches!(err, RemindzError::InvalidSetting { .. }));
        assert!(!io.is_changed());
    }
}
