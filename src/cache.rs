//! Per-session dataset cache with fetch-or-wait semantics.
//!
//! Every dataset key is fetched at most once per cache. Callers register a
//! callback with [`DataCache::ensure_data`]:
//!
//! | State of the key | Effect |
//! |------------------|--------|
//! | resolved         | callback runs immediately with the cached value |
//! | fetch in flight  | callback is queued behind earlier ones |
//! | unknown          | fetch starts, callback is the first waiter |
//!
//! When a fetch resolves, its waiters run once each, in registration order,
//! and the waiter list is discarded. [`DataCache::clear`] drops every queued
//! waiter without running it; the underlying request keeps going and still
//! fills the cache when it lands. [`DataCache::reset`] forgets everything;
//! each fetch carries a [`Ticket`], so a completion from before the reset is
//! dropped even when the same key has been requested again since.
//!
//! The cache is single-threaded. Completions are delivered by the owner
//! through [`DataCache::pump`] or [`DataCache::run_until_idle`].

use crate::api::{Completion, Fetch, Ticket};
use crate::config::SourceConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;

/// Callback waiting for a dataset.
pub type Waiter = Box<dyn FnOnce(Rc<Value>)>;

enum Slot {
    Pending { ticket: Ticket, waiters: Vec<Waiter> },
    Ready(Rc<Value>),
}

/// What [`DataCache::ensure_data`] did with the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Dataset was cached; the callback already ran.
    Cached,
    /// A fetch was already in flight; the callback was queued.
    Joined,
    /// A new fetch was started; the callback is its first waiter.
    Started,
}

pub struct DataCache<F: Fetch> {
    source: SourceConfig,
    fetcher: F,
    slots: HashMap<String, Slot>,
    next_ticket: Ticket,
}

impl<F: Fetch> DataCache<F> {
    pub fn new(source: SourceConfig, fetcher: F) -> Self {
        Self {
            source,
            fetcher,
            slots: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    /// Run `on_ready` with the dataset for `key`, fetching it if needed.
    pub fn ensure_data<C>(&mut self, key: &str, on_ready: C) -> Availability
    where
        C: FnOnce(Rc<Value>) + 'static,
    {
        match self.slots.get_mut(key) {
            Some(Slot::Ready(value)) => {
                log::debug!("dataset {key}: cache hit");
                on_ready(Rc::clone(value));
                Availability::Cached
            }
            Some(Slot::Pending { waiters, .. }) => {
                waiters.push(Box::new(on_ready));
                log::debug!("dataset {key}: joined in-flight fetch ({} waiting)", waiters.len());
                Availability::Joined
            }
            None => {
                let location = self.source.resolve(key);
                let ticket = self.next_ticket;
                self.next_ticket += 1;
                log::debug!("dataset {key}: fetching {location} (ticket {ticket})");
                self.slots.insert(
                    key.to_string(),
                    Slot::Pending {
                        ticket,
                        waiters: vec![Box::new(on_ready)],
                    },
                );
                self.fetcher.start(ticket, key, &location);
                Availability::Started
            }
        }
    }

    /// Resolved dataset for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Rc<Value>> {
        match self.slots.get(key) {
            Some(Slot::Ready(value)) => Some(Rc::clone(value)),
            _ => None,
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        matches!(self.slots.get(key), Some(Slot::Pending { .. }))
    }

    /// Number of callbacks queued for `key`.
    pub fn waiting(&self, key: &str) -> usize {
        match self.slots.get(key) {
            Some(Slot::Pending { waiters, .. }) => waiters.len(),
            _ => 0,
        }
    }

    /// Drop every queued callback without running it.
    ///
    /// In-flight fetches are not cancelled; when they land they populate the
    /// cache but notify nobody. Resolved datasets stay cached.
    pub fn clear(&mut self) {
        for slot in self.slots.values_mut() {
            if let Slot::Pending { waiters, .. } = slot {
                waiters.clear();
            }
        }
    }

    /// Forget everything, resolved datasets included.
    ///
    /// Completions for fetches started before the reset are ignored, even if
    /// the key is requested again before they land.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    /// Deliver a finished fetch.
    pub fn complete(&mut self, completion: Completion) {
        let Completion {
            key,
            ticket,
            result,
        } = completion;
        let Some(slot) = self.slots.get_mut(&key) else {
            log::debug!("dataset {key}: completion after reset dropped");
            return;
        };

        let waiters = match &mut *slot {
            Slot::Pending { ticket: current, waiters } if *current == ticket => {
                std::mem::take(waiters)
            }
            _ => {
                log::debug!("dataset {key}: stale completion (ticket {ticket}) dropped");
                return;
            }
        };

        match result {
            Ok(value) => {
                let value = Rc::new(value);
                *slot = Slot::Ready(Rc::clone(&value));
                log::debug!("dataset {key}: resolved, notifying {}", waiters.len());
                for waiter in waiters {
                    waiter(Rc::clone(&value));
                }
            }
            Err(e) => {
                log::warn!(
                    "dataset {key}: fetch failed ({e}); dropping {} waiter(s)",
                    waiters.len()
                );
                self.slots.remove(&key);
            }
        }
    }

    /// Deliver every completion that is ready now. Returns how many landed.
    pub fn pump(&mut self) -> usize {
        let done = self.fetcher.poll();
        let n = done.len();
        for c in done {
            self.complete(c);
        }
        n
    }

    /// Block until no fetch is in flight, delivering completions as they land.
    pub fn run_until_idle(&mut self) {
        while let Some(c) = self.fetcher.wait() {
            self.complete(c);
        }
    }
}
