//! Tokens held for the lifetime of an owner.
//!
//! The table holds owners weakly and their tokens strongly. Entries are not
//! released when an owner is dropped, only when the table is next compacted,
//! so the bus compacts on every registration.

use std::{
    any::Any,
    collections::HashMap,
    rc::{Rc, Weak},
};

use tracing::debug;

use super::bus::Token;

struct Entry {
    owner: Weak<dyn Any>,
    tokens: Vec<Token>,
}

impl Entry {
    fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

/// Map from weakly-held owners to the tokens tied to them.
///
/// Owners are identified by allocation address, which cannot be reused
/// while the table holds a weak reference to it. Methods that release
/// entries return the released tokens; dropping them ends their
/// subscriptions.
#[derive(Default)]
pub struct LifetimeTable {
    entries: HashMap<usize, Entry>,
}

impl LifetimeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a token until an owner is dropped.
    pub fn tie<O: 'static>(&mut self, owner: &Rc<O>, token: Token) {
        self.entries
            .entry(address(owner))
            .or_insert_with(|| Entry {
                owner: Rc::downgrade(owner) as Weak<dyn Any>,
                tokens: Vec::new(),
            })
            .tokens
            .push(token);
    }

    /// Release the tokens of every dropped owner.
    pub fn compact(&mut self) -> Vec<Token> {
        let dead: Vec<usize> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_alive())
            .map(|(&k, _)| k)
            .collect();

        if !dead.is_empty() {
            debug!(owners = dead.len(), "compacting lifetime table");
        }

        dead.into_iter()
            .flat_map(|k| self.release_at(k))
            .collect()
    }

    /// Release the tokens of one owner, whether or not it has been dropped.
    pub fn release<O>(&mut self, owner: &Rc<O>) -> Vec<Token> {
        self.release_at(address(owner))
    }

    /// Release every token.
    pub fn clear(&mut self) -> Vec<Token> {
        self.entries
            .drain()
            .flat_map(|(_, entry)| entry.tokens)
            .collect()
    }

    /// The number of owners tracked, including dropped owners not yet
    /// compacted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn release_at(&mut self, k: usize) -> Vec<Token> {
        self.entries
            .remove(&k)
            .map(|entry| entry.tokens)
            .unwrap_or_default()
    }
}

fn address<O>(owner: &Rc<O>) -> usize {
    Rc::as_ptr(owner) as *const () as usize
}
