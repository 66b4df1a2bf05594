// Subcommand implementations

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use courier_settings::{JsonFileStore, PropertyKey, PropertyValue, Settings, SettingsError};
use serde_json::json;

use crate::exit_codes::{EXIT_STORE, EXIT_USAGE};
use crate::ValueKind;

#[derive(Debug)]
pub enum CliError {
    /// Bad input from the command line.
    Usage(String),
    /// Preference store failure.
    Settings(SettingsError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) | CliError::Settings(SettingsError::UnknownKey(_)) => EXIT_USAGE,
            CliError::Settings(_) => EXIT_STORE,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => f.write_str(msg),
            CliError::Settings(SettingsError::UnknownKey(key)) => {
                write!(f, "unknown setting '{key}' (run `courier-settings keys` for the list)")
            }
            CliError::Settings(e) => write!(f, "{e}"),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(e: SettingsError) -> Self {
        CliError::Settings(e)
    }
}

fn open(path: &Path) -> Result<Settings, CliError> {
    let store = JsonFileStore::open(path)?;
    Ok(Settings::new(Rc::new(store)))
}

fn json_entry(key: PropertyKey, value: &PropertyValue) -> serde_json::Value {
    json!({
        "key": key.as_str(),
        "value": value.to_dynamic(),
        "kind": value.kind(),
    })
}

pub fn cmd_list(path: &Path, as_json: bool) -> Result<(), CliError> {
    let snapshot = open(path)?.snapshot()?;

    if as_json {
        let entries: Vec<_> = snapshot.iter().map(|(k, v)| json_entry(*k, v)).collect();
        println!("{}", serde_json::Value::Array(entries));
    } else {
        for (key, value) in &snapshot {
            println!("{:<28} {}", key.as_str(), value);
        }
    }
    Ok(())
}

pub fn cmd_get(path: &Path, key: &str, as_json: bool) -> Result<(), CliError> {
    let key: PropertyKey = key.parse()?;
    let value = open(path)?.get(key)?;

    if as_json {
        println!("{}", json_entry(key, &value));
    } else {
        println!("{value}");
    }
    Ok(())
}

pub fn cmd_set(path: &Path, key: &str, raw: &str, kind: Option<ValueKind>) -> Result<(), CliError> {
    let key: PropertyKey = key.parse()?;
    let value = parse_value(raw, kind)?;
    let settings = open(path)?;

    settings.set(key, value.clone())?;
    log::info!("{key} set to {value} in {}", path.display());
    println!("{key} = {value}");
    Ok(())
}

pub fn cmd_unset(path: &Path, key: &str) -> Result<(), CliError> {
    let key: PropertyKey = key.parse()?;
    open(path)?.set(key, PropertyValue::Absent)?;
    println!("{key} = {}", PropertyValue::Absent);
    Ok(())
}

pub fn cmd_keys() -> Result<(), CliError> {
    for key in PropertyKey::ALL {
        println!(
            "{:<28} {:<44} {}",
            key.as_str(),
            key.notification_topic(),
            key.description()
        );
    }
    Ok(())
}

/// Parse a command-line value. Without `kind`: `true`/`false` are booleans,
/// integers are integers, anything else is text.
pub fn parse_value(raw: &str, kind: Option<ValueKind>) -> Result<PropertyValue, CliError> {
    match kind {
        Some(ValueKind::Int) => raw
            .trim()
            .parse::<i64>()
            .map(PropertyValue::Integer)
            .map_err(|_| CliError::Usage(format!("'{raw}' is not an integer"))),
        Some(ValueKind::Text) => Ok(PropertyValue::Text(raw.to_string())),
        Some(ValueKind::Bool) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(PropertyValue::Boolean(true)),
            "false" | "no" | "off" | "0" => Ok(PropertyValue::Boolean(false)),
            _ => Err(CliError::Usage(format!("'{raw}' is not a boolean"))),
        },
        None => Ok(match raw {
            "true" => PropertyValue::Boolean(true),
            "false" => PropertyValue::Boolean(false),
            _ => match raw.parse::<i64>() {
                Ok(i) => PropertyValue::Integer(i),
                Err(_) => PropertyValue::Text(raw.to_string()),
            },
        }),
    }
}
