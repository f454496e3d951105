//! In-process event bus.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::traits::{EventHandler, EventKind, EventSource, HostEvent};

/// Event source that dispatches host events to at most one handler per kind.
///
/// Handlers run on the dispatching thread, outside the bus lock, so a
/// handler may unsubscribe itself or others.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<EventKind, EventHandler>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribed", &self.subscribed())
            .finish()
    }
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch an event. Returns true if a handler received it.
    pub fn dispatch(&self, event: HostEvent) -> bool {
        let handler = {
            let handlers = self
                .handlers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            handlers.get(&event.kind).map(Arc::clone)
        };

        match handler {
            Some(handler) => {
                tracing::trace!(event = %event.kind, "Dispatching event");
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Returns true if a handler is registered for `kind`.
    #[must_use]
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&kind)
    }

    /// Kinds that currently have a handler.
    #[must_use]
    pub fn subscribed(&self) -> Vec<EventKind> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }
}

impl EventSource for EventBus {
    fn subscribe(&self, kind: EventKind, handler: EventHandler) {
        tracing::debug!(event = %kind, passive = kind.is_passive(), "Listener registered");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, handler);
    }

    fn unsubscribe(&self, kind: EventKind) {
        let removed = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
        if removed.is_some() {
            tracing::debug!(event = %kind, "Listener removed");
        }
    }
}
