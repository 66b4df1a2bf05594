//! Known setting identifiers.
//!
//! The set is fixed at compile time. Each key has a canonical string form,
//! which is also its default durable key and the prefix of its change topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;

/// Appended to a key's canonical string to form its notification topic.
pub const NOTIFICATION_SUFFIX: &str = "ChangeNotification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKey {
    // Preferences
    ChatHeadsDisabled,
    NotificationContentVisible,
    Markdown,
    SkipFirstTimeUseChecks,
    PreferredFlashMode,
    DarkMode,

    // Profile
    ProfileName,
    AccentColor,

    // Calling
    SoundAlerts,

    // Analytics
    AnalyticsOptOut,

    // Sounds
    MessageSoundName,
    CallSoundName,
    PingSoundName,

    // Debug
    DisableUI,
    DisableAVS,
    DisableHockey,
    DisableAnalytics,
}

impl PropertyKey {
    /// Every key, in declaration order.
    pub const ALL: [PropertyKey; 17] = [
        PropertyKey::ChatHeadsDisabled,
        PropertyKey::NotificationContentVisible,
        PropertyKey::Markdown,
        PropertyKey::SkipFirstTimeUseChecks,
        PropertyKey::PreferredFlashMode,
        PropertyKey::DarkMode,
        PropertyKey::ProfileName,
        PropertyKey::AccentColor,
        PropertyKey::SoundAlerts,
        PropertyKey::AnalyticsOptOut,
        PropertyKey::MessageSoundName,
        PropertyKey::CallSoundName,
        PropertyKey::PingSoundName,
        PropertyKey::DisableUI,
        PropertyKey::DisableAVS,
        PropertyKey::DisableHockey,
        PropertyKey::DisableAnalytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyKey::ChatHeadsDisabled => "ChatHeadsDisabled",
            PropertyKey::NotificationContentVisible => "NotificationContentVisible",
            PropertyKey::Markdown => "Markdown",
            PropertyKey::SkipFirstTimeUseChecks => "SkipFirstTimeUseChecks",
            PropertyKey::PreferredFlashMode => "PreferredFlashMode",
            PropertyKey::DarkMode => "DarkMode",
            PropertyKey::ProfileName => "ProfileName",
            PropertyKey::AccentColor => "AccentColor",
            PropertyKey::SoundAlerts => "SoundAlerts",
            PropertyKey::AnalyticsOptOut => "AnalyticsOptOut",
            PropertyKey::MessageSoundName => "MessageSoundName",
            PropertyKey::CallSoundName => "CallSoundName",
            PropertyKey::PingSoundName => "PingSoundName",
            PropertyKey::DisableUI => "DisableUI",
            PropertyKey::DisableAVS => "DisableAVS",
            PropertyKey::DisableHockey => "DisableHockey",
            PropertyKey::DisableAnalytics => "DisableAnalytics",
        }
    }

    /// One-line description for settings listings.
    pub fn description(&self) -> &'static str {
        match self {
            PropertyKey::ChatHeadsDisabled => "Disable chat heads in conversation and self profile",
            PropertyKey::NotificationContentVisible => "Show message content in notifications",
            PropertyKey::Markdown => "Enable markdown formatter for messages",
            PropertyKey::SkipFirstTimeUseChecks => "Temporarily skip first time use checks",
            PropertyKey::PreferredFlashMode => "Flash mode for internal camera UI",
            PropertyKey::DarkMode => "Dark mode for conversation",
            PropertyKey::ProfileName => "User name",
            PropertyKey::AccentColor => "Profile accent color",
            PropertyKey::SoundAlerts => "Sound alerts level",
            PropertyKey::AnalyticsOptOut => "Opt out of analytics",
            PropertyKey::MessageSoundName => "Message tone",
            PropertyKey::CallSoundName => "Ringtone",
            PropertyKey::PingSoundName => "Ping tone",
            PropertyKey::DisableUI => "Disable UI (debug)",
            PropertyKey::DisableAVS => "Disable audio/video stack (debug)",
            PropertyKey::DisableHockey => "Disable crash reporting (debug)",
            PropertyKey::DisableAnalytics => "Disable analytics (debug)",
        }
    }

    /// Returns true for the debug feature switches.
    pub fn is_debug(&self) -> bool {
        matches!(
            self,
            PropertyKey::DisableUI
                | PropertyKey::DisableAVS
                | PropertyKey::DisableHockey
                | PropertyKey::DisableAnalytics
        )
    }

    /// Durable key used when a property doesn't override it.
    pub fn store_key(&self) -> &'static str {
        self.as_str()
    }

    /// Topic published on every write: canonical string + `ChangeNotification`.
    pub fn notification_topic(&self) -> String {
        format!("{}{}", self.as_str(), NOTIFICATION_SUFFIX)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_notification_topic_appends_suffix() {
        assert_eq!(PropertyKey::DarkMode.notification_topic(), "DarkModeChangeNotification");
        assert_eq!(
            PropertyKey::ChatHeadsDisabled.notification_topic(),
            "ChatHeadsDisabledChangeNotification"
        );
    }

    #[test]
    fn test_topics_are_unique() {
        let topics: HashSet<String> = PropertyKey::ALL.iter().map(|k| k.notification_topic()).collect();
        assert_eq!(topics.len(), PropertyKey::ALL.len());
    }

    #[test]
    fn test_parse_canonical_names() {
        for key in PropertyKey::ALL {
            assert_eq!(key.as_str().parse::<PropertyKey>().unwrap(), key);
            assert_eq!(key.to_string(), key.as_str());
        }
    }

    #[test]
    fn test_parse_unknown_key() {
        let err = "darkmode".parse::<PropertyKey>().unwrap_err();
        assert_eq!(err, SettingsError::UnknownKey("darkmode".to_string()));
    }

    #[test]
    fn test_debug_family() {
        let debug: Vec<_> = PropertyKey::ALL.iter().filter(|k| k.is_debug()).collect();
        assert_eq!(debug.len(), 4);
        assert!(debug.iter().all(|k| k.as_str().starts_with("Disable")));
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let json = serde_json::to_string(&PropertyKey::SoundAlerts).unwrap();
        assert_eq!(json, "\"SoundAlerts\"");
        let parsed: PropertyKey = serde_json::from_str("\"AccentColor\"").unwrap();
        assert_eq!(parsed, PropertyKey::AccentColor);
    }
}
