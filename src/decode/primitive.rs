//! Decoding rules for Rust primitives and standard collections.
//!
//! JSON producers are rarely consistent about representation, so numbers
//! are also accepted as numeric strings, and booleans as the strings `"true"`
//! and `"false"` (in any case) or the numbers `0` and `1`.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Number, Value};

use super::{
    Attempt, Decodable, DecodeError, KeyDecodable,
    access::{decode_keyed_map, decode_sequence},
    short_type_name,
};

macro_rules! integer {
    ($($t:ty),* $(,)?) => {$(
        impl Decodable for $t {
            fn from_value(value: &Value) -> Attempt<Self> {
                Ok(match value {
                    Value::Number(n) => integral(n).and_then(|n| <$t>::try_from(n).ok()),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                })
            }
        }

        impl KeyDecodable for $t {
            fn from_key(key: &str) -> Result<Self, DecodeError> {
                key.parse().map_err(|_| {
                    DecodeError::invalid(
                        concat!("Invalid ", stringify!($t), " key"),
                        &Value::String(key.to_owned()),
                    )
                })
            }
        }
    )*};
}

integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// The integer held by a number, if it has no fractional part.
fn integral(n: &Number) -> Option<i128> {
    if let Some(n) = n.as_i64() {
        Some(n.into())
    } else if let Some(n) = n.as_u64() {
        Some(n.into())
    } else {
        let f = n.as_f64()?;
        (f.is_finite() && f.fract() == 0.0).then_some(f as i128)
    }
}

impl Decodable for f64 {
    fn from_value(value: &Value) -> Attempt<Self> {
        Ok(match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }
}

impl Decodable for f32 {
    fn from_value(value: &Value) -> Attempt<Self> {
        Ok(f64::from_value(value)?.map(|f| f as f32))
    }
}

impl Decodable for bool {
    fn from_value(value: &Value) -> Attempt<Self> {
        match value {
            Value::Bool(b) => Ok(Some(*b)),
            Value::String(s) => match s.parse::<i64>() {
                Ok(n @ (0 | 1)) => Ok(Some(n == 1)),
                _ if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
                _ if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
                _ => Err(DecodeError::invalid(
                    "Value not a valid bool string input",
                    value,
                )),
            },
            Value::Number(n) => match integral(n) {
                Some(n @ (0 | 1)) => Ok(Some(n == 1)),
                _ => Err(DecodeError::invalid(
                    "Value couldn't be converted to bool",
                    value,
                )),
            },
            _ => Err(DecodeError::invalid(
                "Value couldn't be converted to bool",
                value,
            )),
        }
    }
}

impl Decodable for String {
    fn from_value(value: &Value) -> Attempt<Self> {
        Ok(value.as_str().map(str::to_owned))
    }
}

impl KeyDecodable for String {
    fn from_key(key: &str) -> Result<Self, DecodeError> {
        Ok(key.to_owned())
    }
}

/// Untyped values pass through unchanged.
impl Decodable for Value {
    fn from_value(value: &Value) -> Attempt<Self> {
        Ok(Some(value.clone()))
    }
}

impl<T: Decodable> Decodable for Box<T> {
    fn from_value(value: &Value) -> Attempt<Self> {
        Ok(T::from_value(value)?.map(Box::new))
    }
}

/// Arrays decode element-by-element. Anything other than an array is the
/// wrong shape.
impl<T: Decodable> Decodable for Vec<T> {
    fn from_value(value: &Value) -> Attempt<Self> {
        if !value.is_array() {
            return Ok(None);
        }

        decode_sequence(value, short_type_name::<Self>()).map(Some)
    }
}

/// Objects decode entry-by-entry, with keys converted by [`KeyDecodable`].
/// Anything other than an object is the wrong shape.
impl<K: KeyDecodable, V: Decodable> Decodable for HashMap<K, V> {
    fn from_value(value: &Value) -> Attempt<Self> {
        if !value.is_object() {
            return Ok(None);
        }

        decode_keyed_map(value, short_type_name::<Self>()).map(Some)
    }
}

impl<K: KeyDecodable + Ord, V: Decodable> Decodable for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Attempt<Self> {
        if !value.is_object() {
            return Ok(None);
        }

        decode_keyed_map(value, short_type_name::<Self>()).map(Some)
    }
}
