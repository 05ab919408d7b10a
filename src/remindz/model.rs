//! # Domain Model: Reminders and the Per-File Store
//!
//! A [`Reminder`] is a fact extracted from one line of a source document: a
//! title, a [`ReminderTime`], and the row it was found on. Reminders are either
//! freshly generated by a document scan or restored from the cache; the
//! `generated` flag tells the two apart and is never persisted.
//!
//! [`Reminders`] maps a file identifier to the complete, ordered list of
//! reminders in that file. [`Reminders::replace_file`] is the only mutator: a
//! file's list is always swapped wholesale, never patched, so restoring the same
//! cache twice cannot duplicate records.

use crate::time::ReminderTime;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub file: String,
    pub title: String,
    pub time: ReminderTime,
    pub row_number: usize,
    /// True when produced by a scan in this process, false when restored.
    pub generated: bool,
}

impl Reminder {
    pub fn new(
        file: impl Into<String>,
        title: impl Into<String>,
        time: ReminderTime,
        row_number: usize,
        generated: bool,
    ) -> Self {
        Self {
            file: file.into(),
            title: title.into(),
            time,
            row_number,
            generated,
        }
    }

    pub fn generated(
        file: impl Into<String>,
        title: impl Into<String>,
        time: ReminderTime,
        row_number: usize,
    ) -> Self {
        Self::new(file, title, time, row_number, true)
    }

    pub fn restored(
        file: impl Into<String>,
        title: impl Into<String>,
        time: ReminderTime,
        row_number: usize,
    ) -> Self {
        Self::new(file, title, time, row_number, false)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Reminders {
    file_to_reminders: BTreeMap<String, Vec<Reminder>>,
}

impl Reminders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every reminder of `file` with `reminders`.
    /// An empty list removes the file entirely.
    pub fn replace_file(&mut self, file: impl Into<String>, reminders: Vec<Reminder>) {
        let file = file.into();
        if reminders.is_empty() {
            self.file_to_reminders.remove(&file);
        } else {
            self.file_to_reminders.insert(file, reminders);
        }
    }

    pub fn file_to_reminders(&self) -> &BTreeMap<String, Vec<Reminder>> {
        &self.file_to_reminders
    }

    pub fn by_file(&self, file: &str) -> &[Reminder] {
        self.file_to_reminders
            .get(file)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.file_to_reminders.keys().map(String::as_str)
    }

    pub fn file_count(&self) -> usize {
        self.file_to_reminders.len()
    }

    pub fn len(&self) -> usize {
        self.file_to_reminders.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.file_to_reminders.is_empty()
    }

    /// All reminders, earliest first; ties keep file and row order.
    pub fn sorted_by_time(&self) -> Vec<&Reminder> {
        let mut all: Vec<&Reminder> = self.file_to_reminders.values().flatten().collect();
        all.sort_by(|a, b| a.time.cmp(&b.time));
        all
    }
}
