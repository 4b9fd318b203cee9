use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::editor::{Range, Source};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectionChange {
        range: Option<Range>,
        old_range: Option<Range>,
        source: Source,
    },
    TextChange {
        source: Source,
    },
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::SelectionChange { .. } => EventKind::SelectionChange,
            EditorEvent::TextChange { .. } => EventKind::TextChange,
        }
    }
}

/// What a listener subscribes to. `EditorChange` receives every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SelectionChange,
    TextChange,
    EditorChange,
}

impl EventKind {
    fn matches(self, event: &EditorEvent) -> bool {
        self == EventKind::EditorChange || self == event.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&EditorEvent)>>;

struct ListenerEntry {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl Listeners {
    fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }
}

/// Editor event stream. Clones share the same listener list.
#[derive(Clone, Default)]
pub struct Emitter {
    listeners: Rc<RefCell<Listeners>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, kind: EventKind, handler: impl FnMut(&EditorEvent) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = SubscriptionId(listeners.next_id);
        listeners.next_id += 1;
        listeners.entries.push(ListenerEntry {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Run matching listeners in registration order.
    ///
    /// Listeners added during an emit only see later events; listeners removed
    /// during an emit are skipped.
    pub fn emit(&self, event: &EditorEvent) {
        let snapshot: Vec<(SubscriptionId, Handler)> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.kind.matches(event))
            .map(|entry| (entry.id, entry.handler.clone()))
            .collect();

        tracing::trace!(
            target: "gpui_snow_core::emitter",
            kind = ?event.kind(),
            listener_count = snapshot.len(),
            "emitting editor event"
        );

        for (id, handler) in snapshot {
            if !self.listeners.borrow().contains(id) {
                continue;
            }
            let Ok(mut handler) = handler.try_borrow_mut() else {
                tracing::warn!(
                    target: "gpui_snow_core::emitter",
                    ?id,
                    "listener re-entered while running, skipping"
                );
                continue;
            };
            (&mut *handler)(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

/// A live listener registration. The owner must call [`Subscription::unsubscribe`]
/// when the toolbar is disposed; dropping the handle keeps the listener alive.
#[must_use = "keep the subscription to unsubscribe on disposal"]
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    listeners: Weak<RefCell<Listeners>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.listeners
            .upgrade()
            .is_some_and(|listeners| listeners.borrow().contains(self.id))
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(listeners) = self.listeners.upgrade() else {
            return false;
        };
        let mut listeners = listeners.borrow_mut();
        let before = listeners.entries.len();
        listeners.entries.retain(|entry| entry.id != self.id);
        listeners.entries.len() != before
    }
}
