use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Single-threaded typed event channel.
///
/// Producers `emit` into a pending queue; the owner takes it with
/// [`EventBus::drain`] and hands it to [`EventBus::notify`], which calls
/// listeners in subscription order.
/// Listeners never run re-entrantly from `emit`.
pub struct EventBus<E> {
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
    pending: Vec<E>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_subscription: 0,
            listeners: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: E) {
        self.pending.push(event);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` if the listener existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Takes pending events without notifying listeners.
    pub fn drain(&mut self) -> Vec<E> {
        std::mem::take(&mut self.pending)
    }

    pub fn notify(&mut self, events: &[E]) {
        for event in events {
            for (_, listener) in self.listeners.iter_mut() {
                listener(event);
            }
        }
    }

    /// Drops every listener and pending event.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.pending.clear();
    }
}
