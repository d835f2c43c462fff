//! Preferences - a small durable key-value store
//!
//! Values are plain strings in a flat JSON object, the same shape a browser
//! keeps in local storage. The only key the app uses today is `darkMode`.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{config::APP_DIR, error::StoreError};

pub const PREFS_FILE: &str = "preferences.json";
pub const DARK_MODE_KEY: &str = "darkMode";

const ENABLED: &str = "enabled";
const DISABLED: &str = "disabled";

#[derive(Debug, Clone, Default)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// `<config_dir>/tonecanvas/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
    }

    /// In-memory only; `set` never touches the disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store a value and write the whole map back.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        let old = self.values.remove(key);
        self.flush()?;
        Ok(old)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }

    /// Anything but `enabled` reads as off.
    pub fn dark_mode(&self) -> bool {
        self.get(DARK_MODE_KEY) == Some(ENABLED)
    }

    pub fn set_dark_mode(&mut self, on: bool) -> Result<(), StoreError> {
        self.set(DARK_MODE_KEY, if on { ENABLED } else { DISABLED })
    }
}
