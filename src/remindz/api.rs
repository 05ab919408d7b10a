//! # API Facade
//!
//! [`RemindzApi`] is the host side of the persistence core: it builds the
//! settings catalogue, the reminder store and the coordinator, decides when to
//! load, and dispatches to the command layer.
//!
//! ## Lifecycle
//!
//! 1. [`RemindzApi::new`] wires everything together (coordinator in restoring mode).
//! 2. [`RemindzApi::open`] performs the first load. A corrupt reminder cache is
//!    discarded and the load retried once; the cache is derived data and a
//!    rescan rebuilds it.
//! 3. Commands mutate state through the coordinator.
//! 4. [`RemindzApi::save`] persists, opportunistically or forced.
//!
//! Like the command layer, the API never prints; it returns [`CmdResult`]s.

use crate::commands::{self, CmdMessage, CmdResult};
use crate::config::RemindzConfig;
use crate::error::{RemindzError, Result};
use crate::model::Reminders;
use crate::persistence::PluginDataIo;
use crate::settings::ReminderSettings;
use crate::store::StorageBackend;
use std::cell::RefCell;
use std::rc::Rc;

pub use crate::commands::config::ConfigAction;

pub struct RemindzApi<B: StorageBackend> {
    io: PluginDataIo<B>,
    settings: ReminderSettings,
}

impl<B: StorageBackend> RemindzApi<B> {
    pub fn new(backend: B, config: &RemindzConfig) -> Self {
        let settings = ReminderSettings::new();
        let reminders = Rc::new(RefCell::new(Reminders::new()));
        let io = PluginDataIo::new(backend, Rc::new(settings.registry()), reminders)
            .with_options(config.persistence_options());
        Self { io, settings }
    }

    pub fn open(&mut self) -> Result<CmdResult> {
        let mut result = CmdResult::default();
        match self.io.load() {
            Ok(()) => {}
            Err(RemindzError::CorruptCache(e)) => {
                log::warn!("Could not restore reminder data: {}", e);
                self.io.discard_cache()?;
                self.io.load()?;
                self.io.mark_changed();
                result.add_message(CmdMessage::warning(
                    "Reminder cache was unreadable and has been discarded; rescan your documents",
                ));
            }
            Err(e) => return Err(e),
        }
        Ok(result)
    }

    pub fn status(&self) -> Result<CmdResult> {
        commands::status::run(&self.io)
    }

    pub fn list_reminders(&self, file: Option<&str>) -> Result<CmdResult> {
        commands::list::run(&self.io, file)
    }

    pub fn add_reminder(&self, file: &str, row: usize, time: &str, title: &str) -> Result<CmdResult> {
        commands::add::run(&self.io, file, row, time, title)
    }

    pub fn forget_file(&self, file: &str) -> Result<CmdResult> {
        commands::forget::run(&self.io, file)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.io, action)
    }

    pub fn mark_scanned(&self) -> Result<CmdResult> {
        commands::flags::mark_scanned(&self.io)
    }

    pub fn set_debug(&self, enabled: bool) -> Result<CmdResult> {
        commands::flags::set_debug(&self.io, enabled)
    }

    pub fn save(&mut self, force: bool) -> Result<CmdResult> {
        commands::save::run(&mut self.io, force)
    }

    pub fn debug(&self) -> bool {
        self.io.debug()
    }

    pub fn settings(&self) -> &ReminderSettings {
        &self.settings
    }

    pub fn io(&self) -> &PluginDataIo<B> {
        &self.io
    }
}
