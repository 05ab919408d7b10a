//! # Observable Values
//!
//! An [`Observable`] holds one mutable value and a list of change listeners.
//! Listeners take no arguments; they read the new value back through
//! [`Observable::get`].
//!
//! Two mutation paths exist:
//! - [`Observable::set`]: the user-edit path. Stores the value and notifies
//!   every listener, synchronously and in registration order. Assigning a value
//!   equal to the current one is not a change and notifies nobody.
//! - [`Observable::replace_silently`]: the bulk-load path. Stores the value
//!   without notifying, so restoring persisted state never looks like an edit.
//!
//! Listeners are never removed. There is no cycle detection: a listener that
//! sets the observable it listens to will recurse.
//!
//! Uses `RefCell` for interior mutability since the persistence core is
//! single-threaded, so handles can be shared through `Rc` and mutated via `&self`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener = Rc<dyn Fn()>;

pub struct Observable<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<Listener>>,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Store `value` and notify listeners if it differs from the current value.
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        let unchanged = *self.value.borrow() == value;
        if unchanged {
            return false;
        }
        *self.value.borrow_mut() = value;
        self.notify();
        true
    }

    /// Store `value` without notifying anyone.
    pub fn replace_silently(&self, value: T) {
        *self.value.borrow_mut() = value;
    }

    pub fn on_changed(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        // Snapshot so listeners may read the value or subscribe more listeners.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl<T: Clone + PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.value.borrow())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
