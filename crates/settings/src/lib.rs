//! Settings properties for the Courier client.
//!
//! A typed overlay on the durable preference store:
//! - `PropertyKey`: the fixed set of known settings and their change topics
//! - `PropertyValue`: integer / text / boolean / absent, with bool-int coercing equality
//! - `Property`: store-backed and closure-backed settings that publish on every write
//! - `NotificationBus`: explicit pub/sub registry, passed to properties at construction
//!
//! No UI concepts. Single-threaded: handles are `Rc`-based.

mod bus;
mod error;
mod key;
mod property;
mod settings;
mod store;
mod value;

pub use bus::{ChangeNotification, NotificationBus, Subscription};
pub use error::{Result, SettingsError};
pub use key::{PropertyKey, NOTIFICATION_SUFFIX};
pub use property::{ClosureProperty, GetAction, Property, SetAction, StoreProperty};
pub use settings::Settings;
pub use store::{
    default_store_path, JsonFileStore, MemoryStore, PreferenceStore, PREFERENCES_ENV,
};
pub use value::PropertyValue;
