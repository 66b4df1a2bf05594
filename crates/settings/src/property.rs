//! Settings properties.
//!
//! A property binds one `PropertyKey` to a value. Two backings:
//! - `StoreProperty`: reads and writes a `PreferenceStore` on every access (no cache)
//! - `ClosureProperty`: delegates to caller-supplied getter/setter closures
//!
//! Every successful write publishes a `ChangeNotification` on the key's topic,
//! even when the new value equals the old one.

use serde_json::Value;
use std::fmt;
use std::rc::Rc;

use crate::bus::{ChangeNotification, NotificationBus};
use crate::error::Result;
use crate::key::PropertyKey;
use crate::store::PreferenceStore;
use crate::value::{number_to_int, PropertyValue};

pub trait Property {
    fn name(&self) -> PropertyKey;

    /// Current value; `Absent` when nothing is materialized.
    fn value(&self) -> Result<PropertyValue>;

    /// Write `value` through the backing, then publish on the key's topic.
    ///
    /// Nothing is published when the write fails.
    fn set_value(&mut self, value: PropertyValue) -> Result<()>;

    /// Classify an untyped value and write it.
    fn assign(&mut self, raw: &Value) -> Result<()> {
        self.set_value(PropertyValue::from_dynamic(Some(raw)))
    }

    /// Store the untyped projection of the current value in `out`.
    fn read_into(&self, out: &mut Option<Value>) -> Result<()> {
        *out = self.value()?.to_dynamic();
        Ok(())
    }
}

// ============================================================================
// Store-backed
// ============================================================================

pub struct StoreProperty {
    name: PropertyKey,
    store_key: String,
    store: Rc<dyn PreferenceStore>,
    bus: NotificationBus,
}

impl StoreProperty {
    /// Property stored under the key's default store key.
    pub fn new(name: PropertyKey, store: Rc<dyn PreferenceStore>, bus: NotificationBus) -> Self {
        Self::with_store_key(name, name.store_key(), store, bus)
    }

    pub fn with_store_key(
        name: PropertyKey,
        store_key: impl Into<String>,
        store: Rc<dyn PreferenceStore>,
        bus: NotificationBus,
    ) -> Self {
        Self {
            name,
            store_key: store_key.into(),
            store,
            bus,
        }
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }
}

/// Classify a raw stored value. Numbers read as integers (fractions truncate).
fn classify_stored(raw: Option<Value>) -> PropertyValue {
    match raw {
        Some(Value::Number(n)) => number_to_int(&n, true)
            .map(PropertyValue::Integer)
            .unwrap_or(PropertyValue::Absent),
        Some(Value::String(s)) => PropertyValue::Text(s),
        Some(Value::Bool(b)) => PropertyValue::Boolean(b),
        _ => PropertyValue::Absent,
    }
}

impl Property for StoreProperty {
    fn name(&self) -> PropertyKey {
        self.name
    }

    fn value(&self) -> Result<PropertyValue> {
        let raw = self.store.object(&self.store_key)?;
        Ok(classify_stored(raw))
    }

    fn set_value(&mut self, value: PropertyValue) -> Result<()> {
        log::debug!("{} <- {} (store key {})", self.name, value, self.store_key);
        self.store.set_object(&self.store_key, value.to_dynamic())?;
        self.bus.publish(&ChangeNotification::new(self.name, value));
        Ok(())
    }
}

impl fmt::Debug for StoreProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreProperty")
            .field("name", &self.name)
            .field("store_key", &self.store_key)
            .finish()
    }
}

// ============================================================================
// Closure-backed
// ============================================================================

/// Getter for a closure-backed property; receives the property itself.
pub type GetAction = Box<dyn Fn(&ClosureProperty) -> PropertyValue>;
/// Setter for a closure-backed property; receives the property and the new value.
pub type SetAction = Box<dyn Fn(&ClosureProperty, PropertyValue)>;

/// Property computed by closures, for derived settings that aren't persisted directly.
pub struct ClosureProperty {
    name: PropertyKey,
    get_action: GetAction,
    set_action: SetAction,
    bus: NotificationBus,
}

impl ClosureProperty {
    pub fn new<G, S>(name: PropertyKey, get_action: G, set_action: S, bus: NotificationBus) -> Self
    where
        G: Fn(&ClosureProperty) -> PropertyValue + 'static,
        S: Fn(&ClosureProperty, PropertyValue) + 'static,
    {
        Self {
            name,
            get_action: Box::new(get_action),
            set_action: Box::new(set_action),
            bus,
        }
    }
}

impl Property for ClosureProperty {
    fn name(&self) -> PropertyKey {
        self.name
    }

    fn value(&self) -> Result<PropertyValue> {
        Ok((self.get_action)(self))
    }

    fn set_value(&mut self, value: PropertyValue) -> Result<()> {
        log::debug!("{} <- {} (closure)", self.name, value);
        (self.set_action)(self, value.clone());
        self.bus.publish(&ChangeNotification::new(self.name, value));
        Ok(())
    }
}

impl fmt::Debug for ClosureProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureProperty").field("name", &self.name).finish()
    }
}
