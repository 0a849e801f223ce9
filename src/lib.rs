//! Declarative decoding of parsed JSON into typed values, with a typed
//! notification bus.
//!
//! Sprocket converts untyped [`serde_json::Value`] trees into domain types by
//! way of the [`Decodable`](decode::Decodable) trait. Fields are read from a
//! JSON object with one of three strategies: strict (the field must exist and
//! decode), optional (the field must exist, but an undecodable value becomes
//! `None`), or coerced (anything short of a decodable value becomes `None` or
//! an empty collection). See the [`decode`] module.
//!
//! The [`notify`] module maps named events onto typed descriptors and can tie
//! a subscription to the lifetime of an owning value.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `notify`: enable the notification bus (default).

pub mod decode;
#[cfg(feature = "notify")]
pub mod notify;
