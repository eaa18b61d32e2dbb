//! Change notifier - a current value plus a listener list.
//!
//! Subscribers receive the latest value as soon as they attach, then every
//! later publish in publish order, until their [`Subscription`] is detached
//! or dropped.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct State<T> {
    latest: T,
    listeners: Vec<(u64, Listener<T>)>,
    next_id: u64,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    // Held while delivering so each listener sees publishes in order.
    delivery: Mutex<()>,
}

/// Broadcast of a value with replay-latest semantics.
///
/// Clone-friendly via Arc: clones publish to the same listeners.
/// Listeners must not publish on the notifier that is calling them.
pub struct Notifier<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Default + Clone + Send + Sync + 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync + 'static> Notifier<T> {
    /// Create a notifier whose latest value starts as `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    latest: initial,
                    listeners: Vec::new(),
                    next_id: 1,
                }),
                delivery: Mutex::new(()),
            }),
        }
    }

    /// Attach a listener. It is called with the latest value immediately.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let _delivery = lock(&self.shared.delivery);
        let listener: Listener<T> = Arc::new(listener);
        let (id, latest) = {
            let mut state = lock(&self.shared.state);
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, Arc::clone(&listener)));
            (id, state.latest.clone())
        };
        listener(&latest);

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    lock(&shared.state).listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Replace the latest value and deliver it to every attached listener.
    pub fn publish(&self, value: T) {
        let _delivery = lock(&self.shared.delivery);
        let listeners: Vec<Listener<T>> = {
            let mut state = lock(&self.shared.state);
            state.latest = value.clone();
            state.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(&value);
        }
    }

    /// The most recently published value.
    pub fn latest(&self) -> T {
        lock(&self.shared.state).latest.clone()
    }

    /// Number of attached listeners.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.state).listeners.len()
    }
}

/// Handle to an attached listener. Dropping it detaches the listener.
#[must_use = "dropping a Subscription detaches the listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving updates.
    pub fn detach(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
