//! App-level settings facade.
//!
//! Owns the preference store and the notification bus for the lifetime of the
//! application and hands out properties bound to both. Properties built here
//! share one bus, so a subscriber sees writes from any of them.

use std::fmt;
use std::rc::Rc;

use crate::bus::{ChangeNotification, NotificationBus, Subscription};
use crate::error::Result;
use crate::key::PropertyKey;
use crate::property::{ClosureProperty, Property, StoreProperty};
use crate::store::PreferenceStore;
use crate::value::PropertyValue;

#[derive(Clone)]
pub struct Settings {
    store: Rc<dyn PreferenceStore>,
    bus: NotificationBus,
}

impl Settings {
    /// Settings over `store` with a fresh notification bus.
    pub fn new(store: Rc<dyn PreferenceStore>) -> Self {
        Self::with_bus(store, NotificationBus::new())
    }

    pub fn with_bus(store: Rc<dyn PreferenceStore>, bus: NotificationBus) -> Self {
        Self { store, bus }
    }

    pub fn store(&self) -> &Rc<dyn PreferenceStore> {
        &self.store
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Store-backed property under the key's default store key.
    pub fn property(&self, key: PropertyKey) -> StoreProperty {
        StoreProperty::new(key, Rc::clone(&self.store), self.bus.clone())
    }

    /// Store-backed property under a custom store key.
    pub fn property_with_store_key(&self, key: PropertyKey, store_key: impl Into<String>) -> StoreProperty {
        StoreProperty::with_store_key(key, store_key, Rc::clone(&self.store), self.bus.clone())
    }

    /// Closure-backed property publishing on this bus.
    pub fn closure_property<G, S>(&self, key: PropertyKey, get_action: G, set_action: S) -> ClosureProperty
    where
        G: Fn(&ClosureProperty) -> PropertyValue + 'static,
        S: Fn(&ClosureProperty, PropertyValue) + 'static,
    {
        ClosureProperty::new(key, get_action, set_action, self.bus.clone())
    }

    pub fn get(&self, key: PropertyKey) -> Result<PropertyValue> {
        self.property(key).value()
    }

    pub fn set(&self, key: PropertyKey, value: impl Into<PropertyValue>) -> Result<()> {
        self.property(key).set_value(value.into())
    }

    /// Current value of every known key, in declaration order.
    pub fn snapshot(&self) -> Result<Vec<(PropertyKey, PropertyValue)>> {
        PropertyKey::ALL
            .iter()
            .map(|&key| self.get(key).map(|value| (key, value)))
            .collect()
    }

    /// Subscribe to writes of `key` through any property on this bus.
    pub fn subscribe<F>(&self, key: PropertyKey, callback: F) -> Subscription
    where
        F: FnMut(&ChangeNotification) + 'static,
    {
        self.bus.subscribe(key.notification_topic(), callback)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings").field("bus", &self.bus).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get_through_facade() {
        let settings = Settings::new(Rc::new(MemoryStore::new()));

        settings.set(PropertyKey::ProfileName, "Ada").unwrap();
        settings.set(PropertyKey::SoundAlerts, 1i64).unwrap();

        assert_eq!(settings.get(PropertyKey::ProfileName).unwrap(), PropertyValue::from("Ada"));
        assert_eq!(settings.get(PropertyKey::SoundAlerts).unwrap(), PropertyValue::Integer(1));
        assert!(settings.get(PropertyKey::DarkMode).unwrap().is_absent());
    }

    #[test]
    fn test_subscribers_see_writes_from_any_property() {
        let settings = Settings::new(Rc::new(MemoryStore::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = settings.subscribe(PropertyKey::DarkMode, move |n| s.borrow_mut().push(n.value.clone()));

        let mut a = settings.property(PropertyKey::DarkMode);
        let mut b = settings.property(PropertyKey::DarkMode);
        a.set_value(true.into()).unwrap();
        b.set_value(false.into()).unwrap();
        settings.set(PropertyKey::Markdown, true).unwrap();

        assert_eq!(*seen.borrow(), vec![PropertyValue::Boolean(true), PropertyValue::Boolean(false)]);
    }

    #[test]
    fn test_snapshot_covers_every_key() {
        let settings = Settings::new(Rc::new(MemoryStore::new()));
        settings.set(PropertyKey::AnalyticsOptOut, true).unwrap();

        let snapshot = settings.snapshot().unwrap();
        assert_eq!(snapshot.len(), PropertyKey::ALL.len());
        assert_eq!(snapshot[0].0, PropertyKey::ChatHeadsDisabled);

        let (_, opt_out) = snapshot
            .iter()
            .find(|(k, _)| *k == PropertyKey::AnalyticsOptOut)
            .unwrap();
        assert_eq!(*opt_out, PropertyValue::Boolean(true));
        assert_eq!(snapshot.iter().filter(|(_, v)| !v.is_absent()).count(), 1);
    }

    #[test]
    fn test_closure_property_shares_bus() {
        let settings = Settings::new(Rc::new(MemoryStore::new()));
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let _sub = settings.subscribe(PropertyKey::DisableAVS, move |_| *h.borrow_mut() += 1);

        let mut prop = settings.closure_property(PropertyKey::DisableAVS, |_| PropertyValue::Absent, |_, _| {});
        prop.set_value(PropertyValue::Boolean(true)).unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_file_backed_settings_survive_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        {
            let settings = Settings::new(Rc::new(JsonFileStore::open(&path).unwrap()));
            settings.set(PropertyKey::DarkMode, true).unwrap();
            settings.set(PropertyKey::MessageSoundName, "chime").unwrap();
        }

        let settings = Settings::new(Rc::new(JsonFileStore::open(&path).unwrap()));
        assert!(matches!(settings.get(PropertyKey::DarkMode).unwrap(), PropertyValue::Boolean(true)));
        assert_eq!(settings.get(PropertyKey::MessageSoundName).unwrap(), PropertyValue::from("chime"));
    }

    #[test]
    fn test_custom_store_key() {
        let store = Rc::new(MemoryStore::new());
        let settings = Settings::new(store.clone());
        let mut prop = settings.property_with_store_key(PropertyKey::PreferredFlashMode, "CameraFlashMode");
        prop.set_value(PropertyValue::Integer(1)).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["CameraFlashMode"]);
    }

    #[test]
    fn test_accessors_expose_shared_store_and_bus() {
        let bus = NotificationBus::new();
        let settings = Settings::with_bus(Rc::new(MemoryStore::new()), bus.clone());

        let _sub = settings.subscribe(PropertyKey::Markdown, |_| {});
        assert_eq!(settings.bus().subscriber_count("MarkdownChangeNotification"), 1);
        assert_eq!(bus.subscriber_count("MarkdownChangeNotification"), 1);

        settings.set(PropertyKey::Markdown, true).unwrap();
        assert_eq!(settings.store().object("Markdown").unwrap(), Some(serde_json::json!(true)));
    }
}
