//! Host page notifications and explicit subscriptions.
//!
//! Callbacks are held strongly by their [`Subscription`] guard and weakly by the registry, so
//! dropping the guard detaches the listener. Dead entries are pruned on the next emit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::core::Viewport;

/// Something the host page reports to the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    Load,
    Resize(Viewport),
    OrientationChange,
    Scroll { y: f64 },
    VisibilityChange { hidden: bool },
    PageHide,
}

/// Discriminant of [`HostEvent`], used to pick what a subscription listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Load,
    Resize,
    OrientationChange,
    Scroll,
    VisibilityChange,
    PageHide,
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Load => EventKind::Load,
            Self::Resize(_) => EventKind::Resize,
            Self::OrientationChange => EventKind::OrientationChange,
            Self::Scroll { .. } => EventKind::Scroll,
            Self::VisibilityChange { .. } => EventKind::VisibilityChange,
            Self::PageHide => EventKind::PageHide,
        }
    }
}

type Callback = Rc<dyn Fn(&HostEvent)>;

struct Listener {
    kind: EventKind,
    callback: Weak<dyn Fn(&HostEvent)>,
}

/// Registry of host event listeners.
///
/// Clones share the same listener list.
#[derive(Clone, Default)]
pub struct HostEvents {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl std::fmt::Debug for HostEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostEvents")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl HostEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for events of `kind`. The returned guard keeps it alive.
    #[must_use = "dropping the subscription detaches the listener"]
    pub fn subscribe(&self, kind: EventKind, callback: impl Fn(&HostEvent) + 'static) -> Subscription {
        let strong: Callback = Rc::new(callback);
        self.listeners.borrow_mut().push(Listener {
            kind,
            callback: Rc::downgrade(&strong),
        });
        Subscription {
            kind,
            _callback: strong,
        }
    }

    /// Deliver `event` to every live listener of its kind, in registration order.
    ///
    /// Listeners may subscribe or emit from inside a callback; the registry is not borrowed while
    /// callbacks run.
    pub fn emit(&self, event: &HostEvent) -> usize {
        let kind = event.kind();
        let live: Vec<Callback> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|l| l.callback.strong_count() > 0);
            listeners
                .iter()
                .filter(|l| l.kind == kind)
                .filter_map(|l| l.callback.upgrade())
                .collect()
        };
        for cb in &live {
            cb(event);
        }
        tracing::trace!(?kind, delivered = live.len(), "host event");
        live.len()
    }

    /// Registered listeners, including dead ones not yet pruned.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Guard for one registered listener. Dropping it unsubscribes.
pub struct Subscription {
    kind: EventKind,
    _callback: Callback,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Detach now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("kind", &self.kind).finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/events.rs"]
mod tests;
