//! Untyped notification payloads.

use std::{
    any::{Any, type_name},
    collections::HashMap,
    fmt,
    rc::Rc,
};

use super::NotificationName;

/// A bundle of named values of arbitrary type, carried with a notification.
#[derive(Default)]
pub struct Payload(HashMap<String, Box<dyn Any>>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, returning the payload.
    pub fn with<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a value, replacing any held under the same key.
    pub fn insert<T: Any>(&mut self, key: impl Into<String>, value: T) {
        self.0.insert(key.into(), Box::new(value));
    }

    /// Retrieve a copy of a value, if present with the expected type.
    pub fn try_get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.0.get(key)?.downcast_ref::<T>().cloned()
    }

    /// Retrieve a copy of a value.
    ///
    /// # Panics
    ///
    /// Panics if no value is held under the key, or it is not of type `T`.
    pub fn get<T: Any + Clone>(&self, key: &str) -> T {
        self.try_get(key).unwrap_or_else(|| {
            panic!(
                "notification payload field `{key}` is absent or not a `{}`",
                type_name::<T>()
            )
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// A notification as dispatched: its name, an optional sender, and its
/// payload.
pub struct Envelope {
    pub name: NotificationName,
    pub object: Option<Rc<dyn Any>>,
    pub payload: Payload,
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("name", &self.name)
            .field("object", &self.object.is_some())
            .field("payload", &self.payload)
            .finish()
    }
}
