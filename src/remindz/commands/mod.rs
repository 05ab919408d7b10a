use crate::model::Reminder;
use crate::persistence::Phase;

pub mod add;
pub mod config;
pub mod flags;
pub mod forget;
pub mod list;
pub mod save;
pub mod status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A setting as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub phase: Phase,
    pub scanned: bool,
    pub debug: bool,
    pub changed: bool,
    pub files: usize,
    pub reminders: usize,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub reminders: Vec<Reminder>,
    pub settings: Vec<SettingEntry>,
    pub status: Option<StatusReport>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_reminders(mut self, reminders: Vec<Reminder>) -> Self {
        self.reminders = reminders;
        self
    }

    pub fn with_settings(mut self, settings: Vec<SettingEntry>) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_status(mut self, status: StatusReport) -> Self {
        self.status = Some(status);
        self
    }
}
