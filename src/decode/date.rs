//! Decoding rules for points in time.
//!
//! Strings are matched against an ordered list of formats, the first match
//! winning:
//!
//! 1. `2020-01-02T03:04:05+00:00`
//! 2. `2020-01-02T03:04:05+0000`
//! 3. `2020-01-02T03:04:05.500+00:00`
//! 4. `2020-01-02T03:04:05.500+0000`
//! 5. Any other RFC 3339 timestamp (such as `2020-01-02T03:04:05Z`).
//!
//! Numbers are read as seconds since the Unix epoch, and may be fractional.
//! Decoded times are normalised to UTC.

use std::time::SystemTime;

use serde_json::{Number, Value};
use time::{
    OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use super::{Attempt, Decodable, DecodeError};

const FORMATS: [&[BorrowedFormatItem<'static>]; 4] = [
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory][offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
    ),
];

const NANOS_PER_SECOND: i128 = 1_000_000_000;

impl Decodable for OffsetDateTime {
    fn from_value(value: &Value) -> Attempt<Self> {
        let time = match value {
            Value::String(s) => parse(s)
                .ok_or_else(|| DecodeError::invalid("No date format matched", value))?,
            Value::Number(n) => from_epoch_seconds(n)
                .ok_or_else(|| DecodeError::invalid("Couldn't convert to date", value))?,
            _ => Err(DecodeError::invalid("Couldn't convert to date", value))?,
        };

        Ok(Some(time.to_offset(UtcOffset::UTC)))
    }
}

impl Decodable for SystemTime {
    fn from_value(value: &Value) -> Attempt<Self> {
        Ok(OffsetDateTime::from_value(value)?.map(SystemTime::from))
    }
}

fn parse(s: &str) -> Option<OffsetDateTime> {
    FORMATS
        .iter()
        .find_map(|format| OffsetDateTime::parse(s, *format).ok())
        .or_else(|| OffsetDateTime::parse(s, &Rfc3339).ok())
}

fn from_epoch_seconds(n: &Number) -> Option<OffsetDateTime> {
    let nanos = if let Some(seconds) = n.as_i64() {
        i128::from(seconds) * NANOS_PER_SECOND
    } else {
        let seconds = n.as_f64().filter(|f| f.is_finite())?;
        let whole = seconds.floor();
        let fraction = ((seconds - whole) * 1e9).round() as i128;
        (whole as i128)
            .checked_mul(NANOS_PER_SECOND)?
            .checked_add(fraction)?
    };

    OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
}
