//! Test utilities for compact-rc development.
//!
//! Provides [`Probe`], a payload that records its construction, method
//! calls and destruction into a shared [`LifecycleLog`]. Tests use the log
//! to assert exactly when, and how many times, a payload was freed.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One observable step in a probe's life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Constructed(u32),
    Greeted(u32),
    Destructed(u32),
}

/// Shared, append-only record of [`LifecycleEvent`]s.
///
/// Cloning the log shares the same underlying record.
#[derive(Clone, Default)]
pub struct LifecycleLog {
    events: Rc<RefCell<Vec<LifecycleEvent>>>,
}

impl LifecycleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a probe that reports into this log.
    pub fn probe(&self, id: u32) -> Probe {
        self.record(LifecycleEvent::Constructed(id));
        Probe {
            id,
            log: self.clone(),
        }
    }

    /// Every event recorded so far, in order.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.borrow().clone()
    }

    /// Number of events matching `pred`.
    pub fn count(&self, pred: impl Fn(&LifecycleEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn constructed(&self) -> usize {
        self.count(|e| matches!(e, LifecycleEvent::Constructed(_)))
    }

    pub fn destructed(&self) -> usize {
        self.count(|e| matches!(e, LifecycleEvent::Destructed(_)))
    }

    /// How many times the probe with `id` was dropped. Anything above one
    /// is a double free.
    pub fn destructed_id(&self, id: u32) -> usize {
        self.count(|e| *e == LifecycleEvent::Destructed(id))
    }

    /// Probes constructed but not yet dropped.
    pub fn live(&self) -> usize {
        self.constructed() - self.destructed()
    }

    fn record(&self, event: LifecycleEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl fmt::Debug for LifecycleLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleLog")
            .field("events", &self.events.borrow().len())
            .field("live", &self.live())
            .finish()
    }
}

/// Payload that reports its lifecycle to a [`LifecycleLog`].
#[derive(Debug)]
pub struct Probe {
    id: u32,
    log: LifecycleLog,
}

impl Probe {
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Record a greeting and return it.
    pub fn hello(&self) -> String {
        self.log.record(LifecycleEvent::Greeted(self.id));
        format!("probe {} says hello", self.id)
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.log.record(LifecycleEvent::Destructed(self.id));
    }
}
