use crate::commands::{CmdMessage, CmdResult, StatusReport};
use crate::error::Result;
use crate::persistence::PluginDataIo;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(io: &PluginDataIo<B>) -> Result<CmdResult> {
    let store = io.reminders();
    let store = store.borrow();
    let report = StatusReport {
        phase: io.phase(),
        scanned: io.scanned(),
        debug: io.debug(),
        changed: io.is_changed(),
        files: store.file_count(),
        reminders: store.len(),
    };

    let mut result = CmdResult::default();
    if !report.scanned {
        result.add_message(CmdMessage::warning(
            "Documents have not been fully scanned since the last relevant settings change",
        ));
    }
    Ok(result.with_status(report))
}
