use super::StorageBackend;
use crate::data::PluginData;
use crate::error::{RemindzError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DATA_FILENAME: &str = "data.json";

pub struct FsBackend {
    data_dir: PathBuf,
    cache_dir: PathBuf,
}

impl FsBackend {
    pub fn new(data_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            data_dir,
            cache_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(DATA_FILENAME)
    }

    pub fn item_path(&self, key: &str) -> Result<PathBuf> {
        if !key_is_valid(key) {
            return Err(RemindzError::Store(format!("Invalid cache key: {:?}", key)));
        }
        Ok(self.cache_dir.join(format!("{}.json", key)))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(RemindzError::Io)?;
        }
        Ok(())
    }

    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(RemindzError::Io)?;
        Ok(Some(content))
    }

    /// Write via a uniquely named temp file in the same directory, then rename.
    fn write_atomic(&self, dir: &Path, target: &Path, content: &str) -> Result<()> {
        self.ensure_dir(dir)?;
        let tmp = dir.join(format!(".remindz-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(RemindzError::Io)?;
        fs::rename(&tmp, target).map_err(RemindzError::Io)?;
        Ok(())
    }
}

/// Keys become file names, so they must stay inside the cache directory.
fn key_is_valid(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(|c: char| c == '/' || c == '\\' || c == '\0')
}

impl StorageBackend for FsBackend {
    fn load_data(&self) -> Result<Option<PluginData>> {
        let Some(content) = self.read_optional(&self.data_path())? else {
            return Ok(None);
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let data: Option<PluginData> =
            serde_json::from_str(&content).map_err(RemindzError::Serialization)?;
        Ok(data)
    }

    fn save_data(&self, data: &PluginData) -> Result<()> {
        let content = serde_json::to_string_pretty(data).map_err(RemindzError::Serialization)?;
        self.write_atomic(&self.data_dir, &self.data_path(), &content)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.item_path(key)?;
        self.read_optional(&path)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.item_path(key)?;
        self.write_atomic(&self.cache_dir, &path, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.item_path(key)?;
        if path.exists() {
            fs::remove_file(path).map_err(RemindzError::Io)?;
        }
        Ok(())
    }
}
