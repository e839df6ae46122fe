use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::state::{Field, State};

type Listener = Rc<dyn Fn()>;

/// Publish/subscribe container holding the live menu [`State`]
///
/// The Store is the single source of truth for the render layer:
/// - `set_state` changes a field without notifying anyone
/// - `emit` notifies every subscriber, in subscription order
/// - subscribers re-read the state through `snapshot`
///
/// Cloning a Store yields another handle to the same state.
#[derive(Clone)]
pub struct Store {
    shared: Rc<Shared>,
}

struct Shared {
    state: RefCell<State>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
}

impl Store {
    /// Create a new store with initial state
    pub fn new(initial_state: State) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(initial_state),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    /// Shallow-set one field. Does not emit.
    pub fn set_state(&self, field: Field) {
        field.apply(&mut self.shared.state.borrow_mut());
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> State {
        self.shared.state.borrow().clone()
    }

    /// Read the live state without copying it
    pub fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.shared.state.borrow())
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.shared.state.borrow_mut())
    }

    /// Invoke every subscriber with no arguments
    ///
    /// The listener list is copied before calling out, so subscribers may read
    /// the snapshot, subscribe or unsubscribe while being notified.
    pub fn emit(&self) {
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        log::trace!("store emit to {} subscriber(s)", listeners.len());
        for listener in listeners {
            listener();
        }
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id + 1);
        self.shared
            .listeners
            .borrow_mut()
            .push((id, Rc::new(callback)));

        Subscription {
            shared: Rc::downgrade(&self.shared),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::default())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.shared.state.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`Store::subscribe`]
#[derive(Debug)]
#[must_use = "dropping a Subscription does not unsubscribe; call unsubscribe()"]
pub struct Subscription {
    shared: Weak<Shared>,
    id: u64,
}

impl Subscription {
    /// Remove the callback. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared
                .listeners
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
