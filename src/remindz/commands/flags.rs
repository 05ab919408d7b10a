use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::persistence::PluginDataIo;
use crate::store::StorageBackend;

/// Record that a full document scan has completed.
pub fn mark_scanned<B: StorageBackend>(io: &PluginDataIo<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if io.scanned() {
        result.add_message(CmdMessage::info("Already marked as scanned"));
    } else {
        io.mark_scanned();
        result.add_message(CmdMessage::success("Marked as fully scanned"));
    }
    Ok(result)
}

pub fn set_debug<B: StorageBackend>(io: &PluginDataIo<B>, enabled: bool) -> Result<CmdResult> {
    io.set_debug(enabled);
    let mut result = CmdResult::default();
    let state = if enabled { "on" } else { "off" };
    result.add_message(CmdMessage::success(format!("Debug output {}", state)));
    Ok(result)
}
