//! Test utilities for dux stores
//!
//! - [`ListenerProbe`]: a listener that counts how often it ran
//! - [`ActionRecorder`]: middleware that records every dispatched action
//! - Assertion macros for checking recorded actions
//!
//! # Example
//!
//! ```
//! use dux_core::testing::{ActionRecorder, ListenerProbe};
//! use dux_core::{apply_middleware, assert_dispatched, create_store, EnhancedStore};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Action {
//!     Increment,
//!     Set(i32),
//! }
//!
//! fn reducer(state: &i32, action: &Action) -> i32 {
//!     match action {
//!         Action::Increment => state + 1,
//!         Action::Set(n) => *n,
//!     }
//! }
//!
//! let recorder = ActionRecorder::new();
//! let store: EnhancedStore<i32, Action> =
//!     apply_middleware(recorder.clone()).enhance(create_store)(reducer);
//!
//! let probe = ListenerProbe::new();
//! store.subscribe(probe.listener());
//!
//! store.dispatch(Action::Set(41));
//! store.dispatch(Action::Increment);
//!
//! assert_eq!(probe.count(), 2);
//! let actions = recorder.drain();
//! assert_dispatched!(actions, Action::Set(41));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::middleware::Middleware;
use crate::store::{Dispatch, Listener, Store};

/// A listener that counts its invocations
///
/// Clones share the same counter and the same [`Listener`] identity.
#[derive(Clone, Debug)]
pub struct ListenerProbe {
    count: Rc<Cell<usize>>,
    listener: Listener,
}

impl Default for ListenerProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerProbe {
    /// Create a probe with a count of zero
    pub fn new() -> Self {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        Self {
            count,
            listener: Listener::new(move || counter.set(counter.get() + 1)),
        }
    }

    /// The listener to subscribe; always the same identity for this probe
    pub fn listener(&self) -> Listener {
        self.listener.clone()
    }

    /// How many times the listener has run
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Reset the count to zero
    pub fn reset(&self) {
        self.count.set(0);
    }
}

/// Middleware that records each action before passing it on
///
/// Clones share the same recording, so keep one clone for assertions and
/// hand another to [`apply_middleware`](crate::apply_middleware).
#[derive(Debug)]
pub struct ActionRecorder<A> {
    actions: Rc<RefCell<Vec<A>>>,
}

impl<A> Clone for ActionRecorder<A> {
    fn clone(&self) -> Self {
        Self {
            actions: Rc::clone(&self.actions),
        }
    }
}

impl<A> Default for ActionRecorder<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ActionRecorder<A> {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            actions: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Take all recorded actions, leaving the recording empty
    pub fn drain(&self) -> Vec<A> {
        std::mem::take(&mut *self.actions.borrow_mut())
    }

    /// Number of recorded actions
    pub fn len(&self) -> usize {
        self.actions.borrow().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.actions.borrow().is_empty()
    }
}

impl<A: Clone> ActionRecorder<A> {
    /// A copy of the recorded actions
    pub fn snapshot(&self) -> Vec<A> {
        self.actions.borrow().clone()
    }
}

impl<S, A: Clone> Middleware<S, A> for ActionRecorder<A> {
    fn handle(&self, _store: &Store<S, A>, next: &Dispatch<A>, action: A) -> A {
        self.actions.borrow_mut().push(action.clone());
        next.call(action)
    }
}

/// Assert that a specific action was dispatched.
///
/// # Example
///
/// ```ignore
/// use dux::assert_dispatched;
///
/// let actions = recorder.drain();
/// assert_dispatched!(actions, Action::Increment);
/// assert_dispatched!(actions, Action::Set(n) if *n > 40);
/// ```
#[macro_export]
macro_rules! assert_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be dispatched, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a specific action was NOT dispatched.
///
/// # Example
///
/// ```ignore
/// use dux::assert_not_dispatched;
///
/// let actions = recorder.drain();
/// assert_not_dispatched!(actions, Action::Reset);
/// ```
#[macro_export]
macro_rules! assert_not_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be dispatched, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Find and return the first dispatched action matching a pattern.
///
/// # Example
///
/// ```ignore
/// use dux::find_dispatched;
///
/// let actions = recorder.drain();
/// if let Some(Action::Set(v)) = find_dispatched!(actions, Action::Set(_)) {
///     assert_eq!(*v, 42);
/// }
/// ```
#[macro_export]
macro_rules! find_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().find(|a| matches!(a, $pattern $(if $guard)?))
    };
}

/// Count how many dispatched actions match a pattern.
///
/// # Example
///
/// ```ignore
/// use dux::count_dispatched;
///
/// let actions = recorder.drain();
/// assert_eq!(count_dispatched!(actions, Action::Increment), 3);
/// ```
#[macro_export]
macro_rules! count_dispatched {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions
            .iter()
            .filter(|a| matches!(a, $pattern $(if $guard)?))
            .count()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::{apply_middleware, EnhancedStore};
    use crate::store::create_store;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Foo,
        Bar(i32),
    }

    fn test_reducer(state: &i32, action: &TestAction) -> i32 {
        match action {
            TestAction::Foo => *state,
            TestAction::Bar(n) => state + n,
        }
    }

    fn recorded_store() -> (EnhancedStore<i32, TestAction>, ActionRecorder<TestAction>) {
        let recorder = ActionRecorder::new();
        let store = apply_middleware(recorder.clone()).enhance(create_store)(test_reducer);
        (store, recorder)
    }

    #[test]
    fn test_recorder_drain() {
        let (store, recorder) = recorded_store();

        store.dispatch(TestAction::Foo);
        store.dispatch(TestAction::Bar(42));

        assert_eq!(recorder.len(), 2);
        assert_eq!(
            recorder.snapshot(),
            vec![TestAction::Foo, TestAction::Bar(42)]
        );

        let actions = recorder.drain();
        assert_eq!(actions, vec![TestAction::Foo, TestAction::Bar(42)]);
        assert!(recorder.is_empty());
        assert_eq!(*store.get_state(), 42);
    }

    #[test]
    fn test_probe_counts_and_resets() {
        let (store, _recorder) = recorded_store();
        let probe = ListenerProbe::new();
        let handle = store.subscribe(probe.listener());

        store.dispatch(TestAction::Foo);
        store.dispatch(TestAction::Foo);
        assert_eq!(probe.count(), 2);

        probe.reset();
        handle.unsubscribe();
        store.dispatch(TestAction::Foo);
        assert_eq!(probe.count(), 0);
    }

    #[test]
    fn test_probe_listener_keeps_identity() {
        let probe = ListenerProbe::new();
        assert!(probe.listener().same(&probe.clone().listener()));
    }

    #[test]
    fn test_assert_macros() {
        let actions = vec![TestAction::Foo, TestAction::Bar(42)];

        assert_dispatched!(actions, TestAction::Foo);
        assert_dispatched!(actions, TestAction::Bar(42));
        assert_dispatched!(actions, TestAction::Bar(n) if *n > 40);

        assert_not_dispatched!(actions, TestAction::Bar(99));

        let found = find_dispatched!(actions, TestAction::Bar(_));
        assert_eq!(found, Some(&TestAction::Bar(42)));

        let count = count_dispatched!(actions, TestAction::Bar(_));
        assert_eq!(count, 1);
    }
}
