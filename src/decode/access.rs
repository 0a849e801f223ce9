//! Field accessors over JSON objects.
//!
//! Every accessor combines a strategy for handling failure with the shape of
//! the field's value:
//!
//! | strategy | scalar | sequence | keyed map |
//! |---|---|---|---|
//! | strict | [`require`](Fields::require) | [`require_vec`](Fields::require_vec) | [`require_map`](Fields::require_map) |
//! | optional | [`optional`](Fields::optional) | [`optional_vec`](Fields::optional_vec) | [`optional_map`](Fields::optional_map) |
//! | coerced | [`coerced`](Fields::coerced) | [`coerced_vec`](Fields::coerced_vec) | [`coerced_map`](Fields::coerced_map) |
//!
//! - Strict accessors fail with [`DecodeError::Missing`] for an absent key,
//!   and with [`DecodeError::Invalid`] for a value that does not decode.
//! - Optional accessors also fail for an absent key (including one absent
//!   from a nested object), but return `None` for a value that does not
//!   decode.
//! - Coerced accessors never fail. Scalars become `None`, and collections
//!   become empty.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use super::{Container, Decodable, DecodeError, KeyDecodable};

/// Read fields from a keyed container.
///
/// Only [`raw`](Fields::raw) must be implemented; the accessors are
/// provided in terms of it.
pub trait Fields {
    /// Look up the raw value for a key, failing if the key is absent.
    fn raw(&self, key: &str) -> Result<&Value, DecodeError>;

    /// Decode a required field.
    fn require<T: Decodable>(&self, key: &str) -> Result<T, DecodeError> {
        let value = self.raw(key)?;
        T::from_value(value)?.ok_or_else(|| DecodeError::invalid(key, value))
    }

    /// Decode a field which must exist, but may hold an undecodable value.
    fn optional<T: Decodable>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        absorb_invalid(self.require(key))
    }

    /// Decode a field, treating an absent key or undecodable value as `None`.
    fn coerced<T: Decodable>(&self, key: &str) -> Option<T> {
        absorb_all(key, self.require(key))
    }

    /// Decode a required array field.
    fn require_vec<T: Decodable>(&self, key: &str) -> Result<Vec<T>, DecodeError> {
        decode_sequence(self.raw(key)?, key)
    }

    /// Decode an array field which must exist, but may hold an undecodable
    /// value.
    fn optional_vec<T: Decodable>(&self, key: &str) -> Result<Option<Vec<T>>, DecodeError> {
        absorb_invalid(self.require_vec(key))
    }

    /// Decode an array field, treating an absent key or undecodable value as
    /// an empty array.
    fn coerced_vec<T: Decodable>(&self, key: &str) -> Vec<T> {
        absorb_all(key, self.require_vec(key)).unwrap_or_default()
    }

    /// Decode a required object field into a map with typed keys.
    fn require_map<K: KeyDecodable, V: Decodable>(
        &self,
        key: &str,
    ) -> Result<HashMap<K, V>, DecodeError> {
        decode_keyed_map(self.raw(key)?, key)
    }

    /// Decode an object field which must exist, but may hold an undecodable
    /// value.
    fn optional_map<K: KeyDecodable, V: Decodable>(
        &self,
        key: &str,
    ) -> Result<Option<HashMap<K, V>>, DecodeError> {
        absorb_invalid(self.require_map(key))
    }

    /// Decode an object field, treating an absent key or undecodable value as
    /// an empty map.
    fn coerced_map<K: KeyDecodable, V: Decodable>(&self, key: &str) -> HashMap<K, V> {
        absorb_all(key, self.require_map(key)).unwrap_or_default()
    }
}

impl Fields for Container {
    fn raw(&self, key: &str) -> Result<&Value, DecodeError> {
        self.get(key).ok_or_else(|| DecodeError::Missing(key.to_owned()))
    }
}

/// View a value as a JSON object, failing if it is anything else.
pub fn as_container<'a>(value: &'a Value, context: &str) -> Result<&'a Container, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::invalid(format!("Invalid JSON object: {context}"), value))
}

/// Decode every element of a JSON array.
///
/// Decoding stops at the first element that fails, and reports its error.
pub fn decode_sequence<T: Decodable>(value: &Value, context: &str) -> Result<Vec<T>, DecodeError> {
    let Value::Array(items) = value else {
        Err(DecodeError::invalid(
            format!("Failed to convert {context} to array"),
            value,
        ))?
    };

    items
        .iter()
        .map(|item| {
            T::from_value(item)?.ok_or_else(|| {
                DecodeError::invalid(format!("Error processing array({context}) element"), item)
            })
        })
        .collect()
}

/// Decode every entry of a JSON object into a collection with typed keys.
///
/// Decoding stops at the first entry that fails, and reports its error.
/// Entries are visited in the object's iteration order, which carries no
/// meaning.
pub fn decode_keyed_map<K, V, M>(value: &Value, context: &str) -> Result<M, DecodeError>
where
    K: KeyDecodable,
    V: Decodable,
    M: FromIterator<(K, V)>,
{
    let Value::Object(entries) = value else {
        Err(DecodeError::invalid(
            format!("Failed to convert {context} to dictionary"),
            value,
        ))?
    };

    entries
        .iter()
        .map(|(k, v)| {
            let k = K::from_key(k)?;
            let v = V::from_value(v)?.ok_or_else(|| {
                DecodeError::invalid(format!("Error processing dictionary({context}) entry"), v)
            })?;
            Ok::<_, DecodeError>((k, v))
        })
        .collect()
}

/// Turn an invalid value into `None`, letting absent keys through.
fn absorb_invalid<T>(result: Result<T, DecodeError>) -> Result<Option<T>, DecodeError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_missing() => Err(err),
        Err(_) => Ok(None),
    }
}

/// Turn any failure into `None`.
fn absorb_all<T>(key: &str, result: Result<T, DecodeError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err @ DecodeError::Missing(_)) => {
            trace!(key, %err, "coerced absent field");
            None
        }
        Err(err) => {
            debug!(key, %err, "coerced undecodable field");
            None
        }
    }
}
