//! Durable preference stores.
//!
//! A preference store is a flat key -> scalar map addressed by string keys.
//! Values are kept as `serde_json::Value`; properties classify them on read.
//!
//! The default durable store lives in `~/.config/courier/preferences.json`
//! (or `$COURIER_PREFERENCES` when set).

use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SettingsError};

/// Environment variable overriding the default preferences file.
pub const PREFERENCES_ENV: &str = "COURIER_PREFERENCES";

/// Key -> scalar map backing store-backed properties.
///
/// Methods take `&self`: a store is a shared resource referenced by many
/// properties, and implementations serialize their own access.
pub trait PreferenceStore {
    /// Raw value stored under `key`, or `None` if unset.
    fn object(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`. `None` removes the entry.
    fn set_object(&self, key: &str, value: Option<Value>) -> Result<()>;

    /// Every stored key, sorted.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Get the path of the default preferences file
pub fn default_store_path() -> PathBuf {
    if let Some(path) = std::env::var_os(PREFERENCES_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("courier")
        .join("preferences.json")
}

// ============================================================================
// In-memory store
// ============================================================================

/// Non-durable store, for tests and for settings that only live for one run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl PreferenceStore for MemoryStore {
    fn object(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_object(&self, key: &str, value: Option<Value>) -> Result<()> {
        let mut values = self.values.borrow_mut();
        match value {
            Some(v) => {
                values.insert(key.to_string(), v);
            }
            None => {
                values.remove(key);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.values.borrow().keys().cloned().collect())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Store persisted as a single JSON object.
///
/// The file is loaded once on `open` and rewritten on every change
/// (write to a temp file, then rename over the original).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RefCell<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = load_map(&path)?;
        log::debug!("opened preferences {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values: RefCell::new(values),
        })
    }

    /// Open the default preferences file.
    pub fn open_default() -> Result<Self> {
        Self::open(default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, discarding the loaded contents.
    pub fn reload(&self) -> Result<()> {
        let values = load_map(&self.path)?;
        *self.values.borrow_mut() = values;
        Ok(())
    }

    fn save(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(SettingsError::unavailable)?;
        }

        let json = serde_json::to_string_pretty(values).map_err(SettingsError::corrupt)?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, json).map_err(SettingsError::unavailable)?;
        fs::rename(&temp, &self.path).map_err(SettingsError::unavailable)?;
        Ok(())
    }
}

fn load_map(path: &Path) -> Result<Map<String, Value>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) => {
            log::warn!("cannot read {}: {e}", path.display());
            return Err(SettingsError::unavailable(format!("{}: {e}", path.display())));
        }
    };

    if contents.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SettingsError::corrupt(format!(
            "{}: expected a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ))),
        Err(e) => {
            log::warn!("cannot parse {}: {e}", path.display());
            Err(SettingsError::corrupt(format!("{}: {e}", path.display())))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl PreferenceStore for JsonFileStore {
    fn object(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_object(&self, key: &str, value: Option<Value>) -> Result<()> {
        // Memory only changes once the file is written.
        let mut next = self.values.borrow().clone();
        match value {
            Some(v) => {
                next.insert(key.to_string(), v);
            }
            None => {
                next.remove(key);
            }
        }
        self.save(&next)?;
        *self.values.borrow_mut() = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.values.borrow().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.object("DarkMode").unwrap(), None);

        store.set_object("DarkMode", Some(json!(true))).unwrap();
        assert_eq!(store.object("DarkMode").unwrap(), Some(json!(true)));
        assert_eq!(store.len(), 1);

        store.set_object("DarkMode", None).unwrap();
        assert_eq!(store.object("DarkMode").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_keys_sorted() {
        let store = MemoryStore::new();
        store.set_object("b", Some(json!(1))).unwrap();
        store.set_object("a", Some(json!("x"))).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("preferences.json")).unwrap();
        assert!(store.keys().unwrap().is_empty());
        assert!(!store.path().exists(), "opening must not create the file");
    }

    #[test]
    fn test_json_store_persists_across_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("preferences.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set_object("ProfileName", Some(json!("Ada"))).unwrap();
        store.set_object("SoundAlerts", Some(json!(2))).unwrap();
        store.set_object("DarkMode", Some(json!(true))).unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.object("ProfileName").unwrap(), Some(json!("Ada")));
        assert_eq!(reopened.object("SoundAlerts").unwrap(), Some(json!(2)));
        assert_eq!(reopened.object("DarkMode").unwrap(), Some(json!(true)));
        assert_eq!(reopened.keys().unwrap(), vec!["DarkMode", "ProfileName", "SoundAlerts"]);
    }

    #[test]
    fn test_json_store_remove_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.set_object("Markdown", Some(json!(true))).unwrap();
        store.set_object("Markdown", None).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.object("Markdown").unwrap(), None);
        assert!(!temp_dir.path().join("preferences.json.tmp").exists());
    }

    #[test]
    fn test_json_store_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(SettingsError::CorruptStore { .. })));

        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"), "{err}");
    }

    #[test]
    fn test_json_store_empty_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        fs::write(&path, "\n").unwrap();
        assert!(JsonFileStore::open(&path).unwrap().keys().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_reload_picks_up_external_edits() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let store = JsonFileStore::open(&path).unwrap();
        fs::write(&path, r#"{"AccentColor": 4}"#).unwrap();
        assert_eq!(store.object("AccentColor").unwrap(), None);

        store.reload().unwrap();
        assert_eq!(store.object("AccentColor").unwrap(), Some(json!(4)));
    }

    #[test]
    fn test_json_store_unwritable_location() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path().join("courier");
        let store = JsonFileStore::open(parent.join("preferences.json")).unwrap();

        // Parent "directory" turns out to be a regular file.
        fs::write(&parent, "").unwrap();
        let err = store.set_object("DarkMode", Some(json!(true))).unwrap_err();
        assert!(matches!(err, SettingsError::StoreUnavailable { .. }));
        // Failed writes leave the loaded state untouched.
        assert_eq!(store.object("DarkMode").unwrap(), None);
    }

    // Only test in this crate that touches the process environment.
    #[test]
    fn test_default_store_path_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("override.json");

        std::env::set_var(PREFERENCES_ENV, &path);
        assert_eq!(default_store_path(), path);

        let store = JsonFileStore::open_default().unwrap();
        assert_eq!(store.path(), path.as_path());
        store.set_object("DarkMode", Some(json!(true))).unwrap();
        assert!(path.exists());

        // Empty means unset.
        std::env::set_var(PREFERENCES_ENV, "");
        assert!(default_store_path().ends_with("courier/preferences.json"));

        std::env::remove_var(PREFERENCES_ENV);
        assert_ne!(default_store_path(), path);
    }
}
