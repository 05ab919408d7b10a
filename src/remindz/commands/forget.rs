use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::persistence::PluginDataIo;
use crate::store::StorageBackend;

/// Drop every reminder of `file`, as when the document was deleted.
pub fn run<B: StorageBackend>(io: &PluginDataIo<B>, file: &str) -> Result<CmdResult> {
    let removed = io.reminders().borrow().by_file(file).to_vec();
    let mut result = CmdResult::default();

    if removed.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No reminders recorded for {}",
            file
        )));
        return Ok(result);
    }

    io.replace_file(file, Vec::new());
    result.add_message(CmdMessage::success(format!(
        "Forgot {} reminder(s) from {}",
        removed.len(),
        file
    )));
    Ok(result.with_reminders(removed))
}
