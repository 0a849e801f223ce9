//! Decoding of parsed JSON into typed values.
//!
//! Types publish their decoding rules through the [`Decodable`] trait, and
//! types usable as object keys additionally through [`KeyDecodable`].
//! Aggregates are assembled field-by-field with the accessors of the
//! [`Fields`] trait, implemented for JSON objects.
//!
//! In most cases, these traits can be derived. See the
//! [`Decodable`](macro@Decodable) and [`KeyDecodable`](macro@KeyDecodable)
//! macros for details.

pub mod access;
pub mod coordinate;
pub mod date;
pub mod error;
pub mod primitive;

use std::hash::Hash;

use serde_json::Map;

pub use access::{Fields, as_container, decode_keyed_map, decode_sequence};
pub use coordinate::Coordinate;
pub use error::DecodeError;
pub use serde_json::Value;

/// A JSON object, the unit over which field accessors operate.
pub type Container = Map<String, Value>;

/// The outcome of a decoding attempt.
///
/// `Ok(None)` signals that the value was of the wrong underlying shape for
/// the type. Accessors turn this into [`DecodeError::Invalid`] where a value
/// is required, and into `None` where it is optional.
pub type Attempt<T> = Result<Option<T>, DecodeError>;

/// Derive [`Decodable`] for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// Each field is read from the JSON object under its own name. Supply
/// `key = "..."` to read from another key, and `optional` or `coerced` to
/// select a more lenient strategy (see [`Fields`]).
///
/// ```
/// #[derive(Debug, Decodable)]
/// struct User {
///     name: String,
///     #[decode(key = "nickName", optional)]
///     nick_name: Option<String>,
///     #[decode(key = "cheatCode", coerced)]
///     cheat_code: Option<String>,
///     #[decode(coerced)]
///     notes: Vec<String>,
///     #[decode(key = "playerAbilities")]
///     player_abilities: HashMap<GameObjective, SkillInfo>,
/// }
/// ```
///
/// A coerced field of a type other than `Option<T>` falls back to its
/// [`Default`] value, so coerced collections become empty.
#[cfg(feature = "derive")]
pub use sprocket_derive::Decodable;

/// Construct a value from parsed JSON.
///
/// See the [`Decodable`](macro@Decodable) derive macro for an automatic
/// implementation of this trait.
pub trait Decodable: Sized {
    /// Attempt to construct a value.
    ///
    /// Return `Ok(None)` if the value has the wrong shape, and an error if
    /// it has the right shape but cannot be converted.
    fn from_value(value: &Value) -> Attempt<Self>;
}

/// Derive [`KeyDecodable`] and [`Decodable`] for a fieldless enum.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// Each variant is matched against a string label, by default the variant
/// name in lower camel case. Supply `label = "..."` to match another string.
///
/// ```
/// #[derive(Debug, PartialEq, Eq, Hash, KeyDecodable)]
/// enum GameObjective {
///     War,
///     Trade,
///     #[decode(label = "just-for-fun")]
///     Fun,
/// }
/// ```
#[cfg(feature = "derive")]
pub use sprocket_derive::KeyDecodable;

/// Construct a value from a JSON object key.
///
/// JSON keys are always strings, but are often better represented as a
/// stronger type (for example, an enumeration).
pub trait KeyDecodable: Decodable + Eq + Hash {
    /// Construct a value from a key, failing if the key is not recognised.
    fn from_key(key: &str) -> Result<Self, DecodeError>;
}

/// Decode a value of a [`KeyDecodable`] type from a JSON string.
///
/// This is the conventional [`Decodable`] implementation for key types:
/// non-string values fail, and strings are delegated to
/// [`KeyDecodable::from_key`].
pub fn decode_key_value<K: KeyDecodable>(value: &Value) -> Attempt<K> {
    let Value::String(key) = value else {
        Err(DecodeError::invalid(
            format!("Invalid key for {}", short_type_name::<K>()),
            value,
        ))?
    };

    K::from_key(key).map(Some)
}

/// Decode a value, failing rather than returning nothing.
pub fn decode<T: Decodable>(value: &Value) -> Result<T, DecodeError> {
    T::from_value(value)?.ok_or_else(|| {
        DecodeError::invalid(
            format!("Failed to decode {}", short_type_name::<T>()),
            value,
        )
    })
}

/// Type name without its module path, used in diagnostics.
fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    match base.rfind("::") {
        Some(i) => &name[i + 2..],
        None => name,
    }
}
