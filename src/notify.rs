//! Typed publish/subscribe notifications.
//!
//! A notification is any type implementing [`Notification`]: it has a stable
//! [`NotificationName`], and converts to and from a [`Payload`] when posted.
//! Handlers are registered on a [`NotificationBus`] for a notification type,
//! and receive reconstructed values of that type.
//!
//! A subscription lasts as long as its [`Token`]. Alternatively, it can be
//! tied to the lifetime of an owner held in an [`Rc`](std::rc::Rc), in which
//! case the bus keeps the token until the owner is dropped.
//!
//! _Requires Cargo feature `notify`._
//!
//! # Example
//!
//! ```
//! #[derive(Debug, Notification)]
//! enum MediaDownload {
//!     NoData,
//!     Success,
//!     Failed,
//! }
//!
//! let bus = NotificationBus::new();
//! let view = Rc::new(View::default());
//!
//! bus.subscribe_tied_to_lifetime(&view, |note: MediaDownload| {
//!     println!("{note:?}");
//! });
//!
//! bus.post(&MediaDownload::Success);
//! ```

pub mod bus;
pub mod lifetime;
pub mod payload;

use std::{any::type_name, borrow::Cow, fmt};

pub use bus::{NotificationBus, Token};
pub use lifetime::LifetimeTable;
pub use payload::{Envelope, Payload};

/// Derive [`Notification`] for a fieldless enum or a struct.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// For a fieldless enum, the payload carries the posted variant's label,
/// by default its name in lower camel case. Supply `label = "..."` to use
/// another string.
///
/// ```
/// #[derive(Debug, Notification)]
/// enum MediaDownload {
///     NoData,
///     Success,
///     #[notification(label = "failure")]
///     Failed,
/// }
/// ```
///
/// For a struct, each field is carried in the payload under its name.
/// Supply `key = "..."` to use another key. Field types must implement
/// [`Clone`].
///
/// ```
/// #[derive(Debug, Notification)]
/// #[notification(name = "PostsUpdated")]
/// struct PostsUpdated {
///     #[notification(key = "numItems")]
///     number_of_items: usize,
/// }
/// ```
///
/// The notification name defaults to that derived from the type (see
/// [`NotificationName::of`]), and can be overridden with the `name` container
/// attribute as above.
#[cfg(feature = "derive")]
pub use sprocket_derive::Notification;

/// The stable name under which a notification is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationName(Cow<'static, str>);

impl NotificationName {
    /// A fixed name.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The name derived from a type, `"{type name}.Notification"`.
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Owned(format!("{}.Notification", type_name::<T>())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for NotificationName {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for NotificationName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// A typed notification.
///
/// See the [`Notification`](macro@Notification) derive macro for an
/// automatic implementation of this trait.
pub trait Notification: Sized + 'static {
    /// The name this notification is posted and observed under.
    fn name() -> NotificationName {
        NotificationName::of::<Self>()
    }

    /// Reconstruct a notification from a dispatched payload.
    ///
    /// A payload missing a field, or holding a field of the wrong type, is a
    /// programming error, and implementations should panic.
    fn from_payload(payload: &Payload) -> Self;

    /// Serialise a notification into a payload for dispatch.
    fn to_payload(&self) -> Payload;
}

/// A notification identified entirely by a string label, typically a
/// fieldless enum.
///
/// Use [`labelled_payload`] and [`from_labelled_payload`] to implement
/// [`Notification`] for such a type.
pub trait Labelled: Sized {
    /// The label of this value.
    fn label(&self) -> &'static str;

    /// The value with a label, if one exists.
    fn from_label(label: &str) -> Option<Self>;
}

/// Payload key under which [`Labelled`] notifications carry their label.
pub const LABEL_KEY: &str = "value";

/// Serialise a [`Labelled`] notification.
pub fn labelled_payload<T: Labelled>(value: &T) -> Payload {
    Payload::new().with(LABEL_KEY, value.label().to_owned())
}

/// Reconstruct a [`Labelled`] notification.
///
/// # Panics
///
/// Panics if the payload holds no label, or an unrecognised one.
pub fn from_labelled_payload<T: Labelled>(payload: &Payload) -> T {
    let label: String = payload.get(LABEL_KEY);
    T::from_label(&label).unwrap_or_else(|| {
        panic!(
            "unrecognised label `{label}` for notification `{}`",
            type_name::<T>()
        )
    })
}
