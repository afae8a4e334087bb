//! hive::events
//!
//! Explicit load/save notifications.
//!
//! # Architecture
//!
//! Collaborators register a handler with a priority at startup instead of
//! being discovered. Dispatch runs handlers in descending priority; equal
//! priorities run in registration order.
//!
//! A handler returning [`Flow::Cancel`] for [`HiveEvent::Saving`] stops
//! dispatch and aborts the save. Cancel is ignored for [`HiveEvent::Loaded`].
//!
//! Handlers run without the tree lock held, so they may lock the registry
//! they are handed.
//!
//! # Example
//!
//! ```
//! use hivework::hive::events::{Flow, HiveEvent, Subscribers};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let loads = Arc::new(AtomicUsize::new(0));
//! let seen = loads.clone();
//!
//! let mut subscribers = Subscribers::new();
//! subscribers.subscribe(0, move |event| {
//!     if let HiveEvent::Loaded { .. } = event {
//!         seen.fetch_add(1, Ordering::SeqCst);
//!     }
//!     Flow::Continue
//! });
//! assert_eq!(subscribers.len(), 1);
//! ```

use std::fmt;

use super::registry::Registry;
use crate::core::types::HiveName;

/// Something happened to a hive.
#[derive(Debug)]
pub enum HiveEvent<'a> {
    /// A hive finished loading. `created` is true on first run, when no
    /// file existed and the tree starts empty.
    Loaded {
        registry: &'a Registry,
        created: bool,
    },

    /// A hive is about to be written to `target`.
    Saving {
        registry: &'a Registry,
        target: &'a HiveName,
    },
}

impl HiveEvent<'_> {
    pub fn registry(&self) -> &Registry {
        match self {
            HiveEvent::Loaded { registry, .. } | HiveEvent::Saving { registry, .. } => registry,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            HiveEvent::Loaded { .. } => "loaded",
            HiveEvent::Saving { .. } => "saving",
        }
    }
}

/// What a handler wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Cancel,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Every handler ran.
    Completed,
    /// A handler cancelled a save; later handlers did not run.
    Cancelled { by: SubscriptionId },
}

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn Fn(&HiveEvent<'_>) -> Flow + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    priority: i32,
    handler: Handler,
}

/// Ordered set of event handlers.
#[derive(Default)]
pub struct Subscribers {
    // Kept sorted: descending priority, then registration order.
    entries: Vec<Subscription>,
    next_id: u64,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` at `priority`. Higher priorities run first.
    pub fn subscribe<F>(&mut self, priority: i32, handler: F) -> SubscriptionId
    where
        F: Fn(&HiveEvent<'_>) -> Flow + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let at = self.entries.partition_point(|s| s.priority >= priority);
        self.entries.insert(
            at,
            Subscription {
                id,
                priority,
                handler: Box::new(handler),
            },
        );
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every handler for `event` in priority order.
    pub fn notify(&self, event: &HiveEvent<'_>) -> Dispatch {
        for sub in &self.entries {
            let flow = (sub.handler)(event);
            if flow == Flow::Cancel {
                match event {
                    HiveEvent::Saving { .. } => {
                        tracing::debug!(
                            event = event.kind(),
                            priority = sub.priority,
                            "handler cancelled save"
                        );
                        return Dispatch::Cancelled { by: sub.id };
                    }
                    HiveEvent::Loaded { .. } => {
                        tracing::debug!(
                            event = event.kind(),
                            "ignoring cancel from load handler"
                        );
                    }
                }
            }
        }
        Dispatch::Completed
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field(
                "priorities",
                &self.entries.iter().map(|s| s.priority).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tree::Tree;
    use std::sync::{Arc, Mutex};

    fn registry() -> Registry {
        Registry::new(HiveName::new("main").unwrap(), Tree::new())
    }

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, Subscribers) {
        (Arc::new(Mutex::new(Vec::new())), Subscribers::new())
    }

    #[test]
    fn runs_in_descending_priority_then_registration_order() {
        let (log, mut subs) = recorder();
        for (priority, label) in [(0, "low"), (10, "high-a"), (10, "high-b"), (5, "mid")] {
            let log = log.clone();
            subs.subscribe(priority, move |_| {
                log.lock().unwrap().push(label);
                Flow::Continue
            });
        }

        let reg = registry();
        let outcome = subs.notify(&HiveEvent::Loaded {
            registry: &reg,
            created: true,
        });
        assert_eq!(outcome, Dispatch::Completed);
        assert_eq!(*log.lock().unwrap(), vec!["high-a", "high-b", "mid", "low"]);
    }

    #[test]
    fn cancel_stops_save_dispatch() {
        let (log, mut subs) = recorder();
        let l = log.clone();
        subs.subscribe(1, move |_| {
            l.lock().unwrap().push("never");
            Flow::Continue
        });
        let canceller = subs.subscribe(2, |_| Flow::Cancel);

        let reg = registry();
        let target = HiveName::new("main").unwrap();
        let outcome = subs.notify(&HiveEvent::Saving {
            registry: &reg,
            target: &target,
        });
        assert_eq!(outcome, Dispatch::Cancelled { by: canceller });
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn cancel_is_ignored_for_loaded() {
        let (log, mut subs) = recorder();
        subs.subscribe(2, |_| Flow::Cancel);
        let l = log.clone();
        subs.subscribe(1, move |_| {
            l.lock().unwrap().push("ran");
            Flow::Continue
        });

        let reg = registry();
        let outcome = subs.notify(&HiveEvent::Loaded {
            registry: &reg,
            created: false,
        });
        assert_eq!(outcome, Dispatch::Completed);
        assert_eq!(*log.lock().unwrap(), vec!["ran"]);
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let mut subs = Subscribers::new();
        let id = subs.subscribe(0, |_| Flow::Cancel);
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        assert!(subs.is_empty());
    }

    #[test]
    fn handler_can_lock_registry() {
        let mut subs = Subscribers::new();
        subs.subscribe(0, |event| {
            let mut tree = event.registry().lock();
            let root = tree.root();
            let _ = tree.add(
                root,
                crate::core::entry::Entry::leaf("flushed", true).unwrap(),
            );
            Flow::Continue
        });

        let reg = registry();
        let target = reg.name().clone();
        subs.notify(&HiveEvent::Saving {
            registry: &reg,
            target: &target,
        });
        assert_eq!(reg.lock().len(), 2);
    }
}
