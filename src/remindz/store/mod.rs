//! # Storage Layer
//!
//! One storage port, two regions with different characteristics:
//!
//! 1. **Durable**: a small JSON blob ([`PluginData`]) holding the settings and
//!    scan flags. Survives restarts.
//! 2. **Fast**: a string-keyed item store used for the larger reminder cache.
//!    Quick to read and write, but a host may lose it (cleared cache, new
//!    device). Callers must treat a missing item as "nothing cached".
//!
//! Both regions sit behind the single [`StorageBackend`] trait so the
//! persistence coordinator can keep them consistent without knowing where the
//! bytes live.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production backend. Durable blob in
//!   `<data_dir>/data.json`, fast items in `<cache_dir>/<key>.json`. All writes
//!   are atomic (temp file, then rename).
//! - [`mem_backend::MemBackend`]: in-memory backend for tests and embedding,
//!   with write counters and write-failure simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── data.json          # Durable blob
//! └── config.json        # Tool configuration
//! <cache_dir>/
//! └── reminders.json     # Fast-tier reminder cache
//! ```

use crate::data::PluginData;
use crate::error::Result;

pub mod fs_backend;
pub mod mem_backend;

/// Fast-tier key under which the reminder cache is stored.
pub const REMINDERS_CACHE_KEY: &str = "reminders";

/// Abstract interface for the two storage regions.
pub trait StorageBackend {
    // --- Durable Region ---

    /// Load the durable blob.
    /// Returns Ok(None) when nothing has been saved yet.
    fn load_data(&self) -> Result<Option<PluginData>>;

    /// Replace the durable blob.
    fn save_data(&self, data: &PluginData) -> Result<()>;

    // --- Fast Region ---

    /// Read a raw item. Returns Ok(None) if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a raw item, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove an item. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
