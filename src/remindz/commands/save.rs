use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::persistence::PluginDataIo;
use crate::store::StorageBackend;

pub fn run<B: StorageBackend>(io: &mut PluginDataIo<B>, force: bool) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if io.save(force)? {
        result.add_message(CmdMessage::success("Saved"));
    } else {
        result.add_message(CmdMessage::info("Nothing to save"));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reminders;
    use crate::settings::ReminderSettings;
    use crate::store::mem_backend::MemBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_save_reports_outcome() {
        let settings = ReminderSettings::new();
        let mut io = PluginDataIo::new(
            MemBackend::new(),
            Rc::new(settings.registry()),
            Rc::new(RefCell::new(Reminders::new())),
        );
        io.load().unwrap();

        let skipped = run(&mut io, false).unwrap();
        assert_eq!(skipped.messages[0].content, "Nothing to save");

        let forced = run(&mut io, true).unwrap();
        assert_eq!(forced.messages[0].content, "Saved");
        assert_eq!(io.backend().durable_write_count(), 1);
    }
}
