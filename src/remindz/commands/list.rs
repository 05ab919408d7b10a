use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::persistence::PluginDataIo;
use crate::store::StorageBackend;

/// List reminders earliest first, optionally only those of one file.
pub fn run<B: StorageBackend>(io: &PluginDataIo<B>, file: Option<&str>) -> Result<CmdResult> {
    let store = io.reminders();
    let store = store.borrow();
    let reminders: Vec<_> = store
        .sorted_by_time()
        .into_iter()
        .filter(|r| file.map_or(true, |f| r.file == f))
        .cloned()
        .collect();

    let mut result = CmdResult::default();
    if reminders.is_empty() {
        result.add_message(CmdMessage::info("No reminders found."));
    }
    Ok(result.with_reminders(reminders))
}
