//! Synchronous, single-threaded notification dispatch.

use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};

use super::{Envelope, LifetimeTable, Notification, NotificationName};

type Handler = Rc<dyn Fn(&Envelope)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: HashMap<NotificationName, Vec<(u64, Handler)>>,
}

impl Registry {
    fn insert(&mut self, name: NotificationName, handler: Handler) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.entry(name).or_default().push((id, handler));
        id
    }

    fn remove(&mut self, name: &NotificationName, id: u64) -> Option<Handler> {
        let handlers = self.observers.get_mut(name)?;
        let i = handlers.iter().position(|(h, _)| *h == id)?;
        let (_, handler) = handlers.remove(i);

        if handlers.is_empty() {
            self.observers.remove(name);
        }

        Some(handler)
    }

    fn contains(&self, name: &NotificationName, id: u64) -> bool {
        self.observers
            .get(name)
            .is_some_and(|handlers| handlers.iter().any(|(h, _)| *h == id))
    }

    fn matching(&self, name: &NotificationName) -> Vec<Handler> {
        self.observers
            .get(name)
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }
}

/// A handle to a subscription, ending it when dropped.
///
/// Tokens outliving their bus are inert.
#[derive(Debug)]
#[must_use = "dropping a token ends its subscription"]
pub struct Token {
    id: u64,
    name: NotificationName,
    registry: Weak<RefCell<Registry>>,
}

impl Token {
    /// The name of the notifications this subscription receives.
    pub fn name(&self) -> &NotificationName {
        &self.name
    }

    /// Whether this subscription is still receiving notifications.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(&self.name, self.id))
    }
}

impl Drop for Token {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        // Release the borrow before the handler (and anything it captured)
        // is dropped.
        let handler = registry.borrow_mut().remove(&self.name, self.id);

        if handler.is_some() {
            trace!(name = %self.name, id = self.id, "removed observer");
        }
    }
}

/// Dispatches notifications to subscribed handlers.
///
/// Dispatch is synchronous, and the order in which handlers are called is
/// unspecified. Handlers may post, subscribe and drop tokens while handling
/// a notification; a handler posting the notification it handles will
/// recurse without bound.
///
/// The bus is not thread-safe.
pub struct NotificationBus {
    registry: Rc<RefCell<Registry>>,
    lifetimes: RefCell<LifetimeTable>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            registry: Rc::default(),
            lifetimes: RefCell::default(),
        }
    }

    /// Post a notification.
    pub fn post<N: Notification>(&self, notification: &N) {
        self.post_with_object(notification, None);
    }

    /// Post a notification, attaching its sender.
    ///
    /// The sender is only visible to handlers registered through
    /// [`subscribe_envelope`](Self::subscribe_envelope).
    pub fn post_with_object<N: Notification>(
        &self,
        notification: &N,
        object: Option<Rc<dyn Any>>,
    ) {
        self.post_envelope(&Envelope {
            name: N::name(),
            object,
            payload: notification.to_payload(),
        });
    }

    /// Dispatch an envelope to every handler registered for its name,
    /// returning the number of handlers called.
    pub fn post_envelope(&self, envelope: &Envelope) -> usize {
        // Snapshot, so handlers may re-enter the bus.
        let handlers = self.registry.borrow().matching(&envelope.name);

        debug!(
            name = %envelope.name,
            observers = handlers.len(),
            "posting notification"
        );

        for handler in &handlers {
            handler(envelope);
        }

        handlers.len()
    }

    /// Subscribe to notifications of type `N`.
    pub fn subscribe<N: Notification>(&self, handler: impl Fn(N) + 'static) -> Token {
        self.subscribe_envelope(N::name(), move |envelope| {
            handler(N::from_payload(&envelope.payload))
        })
    }

    /// Subscribe to raw envelopes posted under a name.
    pub fn subscribe_envelope(
        &self,
        name: NotificationName,
        handler: impl Fn(&Envelope) + 'static,
    ) -> Token {
        self.compact();

        let id = self
            .registry
            .borrow_mut()
            .insert(name.clone(), Rc::new(handler));

        trace!(name = %name, id, "added observer");

        Token {
            id,
            name,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Subscribe to notifications of type `N` until `owner` is dropped.
    ///
    /// The handler is not called once the owner has been dropped. Its
    /// registration is released at the next compaction, which happens on
    /// every subscription or by calling [`compact`](Self::compact).
    pub fn subscribe_tied_to_lifetime<N, O>(&self, owner: &Rc<O>, handler: impl Fn(N) + 'static)
    where
        N: Notification,
        O: 'static,
    {
        let alive = Rc::downgrade(owner);
        let token = self.subscribe(move |note: N| {
            if alive.strong_count() > 0 {
                handler(note);
            }
        });

        self.lifetimes.borrow_mut().tie(owner, token);
    }

    /// End a subscription.
    pub fn dispose(&self, token: Token) {
        drop(token);
    }

    /// Release subscriptions tied to dropped owners, returning the number
    /// released.
    pub fn compact(&self) -> usize {
        let released = self.lifetimes.borrow_mut().compact();
        released.len()
    }

    /// Release every subscription tied to an owner, returning the number
    /// released.
    pub fn release<O>(&self, owner: &Rc<O>) -> usize {
        let released = self.lifetimes.borrow_mut().release(owner);
        released.len()
    }

    /// Release every subscription tied to any owner, returning the number
    /// released.
    pub fn teardown(&self) -> usize {
        let released = self.lifetimes.borrow_mut().clear();
        released.len()
    }

    /// The number of owners with subscriptions tied to them, including
    /// dropped owners not yet compacted.
    pub fn tracked_owners(&self) -> usize {
        self.lifetimes.borrow().len()
    }

    /// The number of handlers registered for a name.
    pub fn observer_count(&self, name: &NotificationName) -> usize {
        self.registry
            .borrow()
            .observers
            .get(name)
            .map_or(0, Vec::len)
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("NotificationBus")
            .field("names", &registry.observers.len())
            .field("tracked_owners", &self.lifetimes.borrow().len())
            .finish()
    }
}
