use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// Backing store could not be read or written (I/O).
    StoreUnavailable { reason: String },
    /// Durable file is not a JSON object.
    CorruptStore { reason: String },
    /// String does not name a known property.
    UnknownKey(String),
}

impl SettingsError {
    pub(crate) fn unavailable(reason: impl fmt::Display) -> Self {
        Self::StoreUnavailable { reason: reason.to_string() }
    }

    pub(crate) fn corrupt(reason: impl fmt::Display) -> Self {
        Self::CorruptStore { reason: reason.to_string() }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreUnavailable { reason } => write!(f, "preference store unavailable: {reason}"),
            Self::CorruptStore { reason } => write!(f, "preference store corrupt: {reason}"),
            Self::UnknownKey(key) => write!(f, "unknown setting: {key}"),
        }
    }
}

impl std::error::Error for SettingsError {}

pub type Result<T> = std::result::Result<T, SettingsError>;
