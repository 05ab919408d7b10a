use crate::commands::{CmdMessage, CmdResult};
use crate::error::{RemindzError, Result};
use crate::model::Reminder;
use crate::persistence::PluginDataIo;
use crate::store::StorageBackend;
use crate::time::ReminderTime;

/// Record a reminder found on `row` of `file`, as a scan would.
///
/// A row holds at most one reminder, so an existing reminder on the same row is
/// replaced. The file's whole list is swapped in through `replace_file`.
pub fn run<B: StorageBackend>(
    io: &PluginDataIo<B>,
    file: &str,
    row: usize,
    time: &str,
    title: &str,
) -> Result<CmdResult> {
    let title = title.trim();
    if title.is_empty() {
        return Err(RemindzError::Api("Title cannot be empty".into()));
    }
    let time = ReminderTime::parse(time)?;

    let mut list: Vec<Reminder> = io
        .reminders()
        .borrow()
        .by_file(file)
        .iter()
        .filter(|r| r.row_number != row)
        .cloned()
        .collect();
    let reminder = Reminder::generated(file, title, time, row);
    list.push(reminder.clone());
    list.sort_by_key(|r| r.row_number);
    io.replace_file(file, list);

    let mut result = CmdResult::default().with_reminders(vec![reminder]);
    result.add_message(CmdMessage::success(format!(
        "Reminder added ({}:{}): {} @ {}",
        file, row, title, time
    )));
    Ok(result)
}
