//! Single-store state container with listener subscriptions

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

/// A pure state transition: `(previous state, action) -> next state`
///
/// Reducers read the previous state by reference and return a wholly new
/// value. By convention they return an equal copy of the previous state for
/// actions they don't recognize.
///
/// Implemented for every `Fn(&S, &A) -> S`, so plain functions work directly:
///
/// ```
/// use dux_core::{create_store, Reducer};
///
/// #[derive(Clone, Debug)]
/// enum Counter {
///     Inc,
/// }
///
/// fn counter(state: &i32, action: &Counter) -> i32 {
///     match action {
///         Counter::Inc => state + 1,
///     }
/// }
///
/// assert_eq!(counter.reduce(&1, &Counter::Inc), 2);
/// let store = create_store(counter);
/// store.dispatch(Counter::Inc);
/// assert_eq!(*store.get_state(), 1);
/// ```
pub trait Reducer<S, A> {
    /// Compute the next state
    fn reduce(&self, state: &S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S,
{
    fn reduce(&self, state: &S, action: &A) -> S {
        self(state, action)
    }
}

/// A zero-argument callback invoked after every successful dispatch
///
/// Listeners are compared by identity: cloning a `Listener` yields the same
/// listener, while wrapping the same closure twice yields two different ones.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn()>);

impl Listener {
    /// Wrap a callback
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Invoke the callback
    pub fn call(&self) {
        (self.0)()
    }

    /// Whether both handles refer to the same listener
    pub fn same(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<F: Fn() + 'static> From<F> for Listener {
    fn from(callback: F) -> Self {
        Self::new(callback)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

type ListenerList = RefCell<Vec<Listener>>;

/// Handle returned by [`Store::subscribe`]
///
/// Dropping the handle does not unsubscribe; call [`Unsubscribe::unsubscribe`].
pub struct Unsubscribe {
    listeners: Weak<ListenerList>,
    listener: Listener,
    spent: Cell<bool>,
}

impl Unsubscribe {
    /// Remove the first registered occurrence of this subscription's listener
    ///
    /// Only the first call has an effect. Does nothing if the listener is no
    /// longer registered or the store is gone.
    pub fn unsubscribe(&self) {
        if self.spent.replace(true) {
            return;
        }
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        let mut listeners = listeners.borrow_mut();
        if let Some(index) = listeners.iter().position(|l| l.same(&self.listener)) {
            listeners.remove(index);
            debug!(remaining = listeners.len(), "Listener unsubscribed");
        }
    }

    /// The listener this handle removes
    pub fn listener(&self) -> &Listener {
        &self.listener
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("listener", &self.listener)
            .field("spent", &self.spent.get())
            .finish()
    }
}

/// A dispatch function as a first-class value
///
/// Cloning is cheap and every clone calls the same function. Stores hand these
/// out via [`StoreApi::dispatcher`]; middleware receives one as `next`.
pub struct Dispatch<A>(Rc<dyn Fn(A) -> A>);

impl<A> Dispatch<A> {
    /// Wrap a dispatch function
    pub fn new(dispatch: impl Fn(A) -> A + 'static) -> Self {
        Self(Rc::new(dispatch))
    }

    /// Dispatch an action, returning what the underlying function returns
    pub fn call(&self, action: A) -> A {
        (self.0)(action)
    }
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<A> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dispatch")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// The public contract shared by [`Store`] and
/// [`EnhancedStore`](crate::EnhancedStore)
///
/// UI code written against this trait doesn't care whether middleware sits in
/// front of the reducer.
pub trait StoreApi<S, A> {
    /// The current state
    fn get_state(&self) -> Rc<S>;

    /// Feed an action through the reducer and notify listeners
    fn dispatch(&self, action: A) -> A;

    /// Register a listener
    fn subscribe(&self, listener: Listener) -> Unsubscribe;

    /// This store's dispatch as a standalone function value
    fn dispatcher(&self) -> Dispatch<A>;
}

struct StoreInner<S, A> {
    state: RefCell<Rc<S>>,
    reducer: Box<dyn Reducer<S, A>>,
    listeners: Rc<ListenerList>,
}

/// Centralized state container
///
/// The store owns the only reference to the current state and the list of
/// listeners. `Store` is a handle: clones share the same state, and all
/// methods take `&self` so listeners may dispatch or unsubscribe while a
/// notification pass is running.
///
/// # Type Parameters
/// * `S` - The state type
/// * `A` - The action type
///
/// # Example
/// ```
/// use dux_core::Store;
///
/// #[derive(Clone, Debug)]
/// enum CounterAction {
///     Increment,
///     Decrement,
/// }
///
/// fn reducer(state: &i32, action: &CounterAction) -> i32 {
///     match action {
///         CounterAction::Increment => state + 1,
///         CounterAction::Decrement => state - 1,
///     }
/// }
///
/// let store = Store::new(0, reducer);
/// let renderer = store.clone();
/// store.subscribe(move || println!("count is {}", renderer.get_state()));
///
/// store.dispatch(CounterAction::Increment);
/// assert_eq!(*store.get_state(), 1);
/// ```
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Create a store whose initial state is `S::default()`
///
/// The default stands in for "no state yet": reducers see it on the first
/// dispatch the same way they'd see a missing previous state.
pub fn create_store<S, A, R>(reducer: R) -> Store<S, A>
where
    S: Default + 'static,
    A: 'static,
    R: Reducer<S, A> + 'static,
{
    Store::new(S::default(), reducer)
}

impl<S: 'static, A: 'static> Store<S, A> {
    /// Create a new store with initial state and reducer
    pub fn new(state: S, reducer: impl Reducer<S, A> + 'static) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(state)),
                reducer: Box::new(reducer),
                listeners: Rc::new(RefCell::new(Vec::new())),
            }),
        }
    }

    /// Get the current state
    ///
    /// The returned `Rc` keeps that state value alive even after later
    /// dispatches replace it.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Dispatch an action to the store
    ///
    /// Computes the next state with the reducer, replaces the current state
    /// with it, then invokes every registered listener in subscription order.
    /// Returns the action it was given.
    ///
    /// If the reducer panics, the panic propagates to the caller, the previous
    /// state stays in place, and no listener runs.
    ///
    /// A listener may call `dispatch` again; that nested dispatch, including
    /// its own notification pass, completes before the outer pass moves on.
    pub fn dispatch(&self, action: A) -> A {
        let next = {
            let current = self.get_state();
            self.inner.reducer.reduce(&current, &action)
        };
        *self.inner.state.borrow_mut() = Rc::new(next);
        self.notify();
        action
    }

    /// Register a listener, returning a handle that removes it again
    ///
    /// Subscribing the same [`Listener`] twice registers it twice; it then
    /// runs twice per dispatch.
    pub fn subscribe(&self, listener: impl Into<Listener>) -> Unsubscribe {
        let listener = listener.into();
        let mut listeners = self.inner.listeners.borrow_mut();
        listeners.push(listener.clone());
        debug!(listeners = listeners.len(), "Listener subscribed");
        Unsubscribe {
            listeners: Rc::downgrade(&self.inner.listeners),
            listener,
            spent: Cell::new(false),
        }
    }

    /// This store's dispatch as a standalone function value
    pub fn dispatcher(&self) -> Dispatch<A> {
        let store = self.clone();
        Dispatch::new(move |action| store.dispatch(action))
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Run the listeners over the live list.
    ///
    /// The pass is bounded by the length at its start, so listeners added
    /// during the pass wait for the next dispatch. Removing an entry shifts the
    /// ones after it down, which can skip a listener for this pass.
    fn notify(&self) {
        let len = self.inner.listeners.borrow().len();
        trace!(listeners = len, "Notifying listeners");
        for index in 0..len {
            let listener = self.inner.listeners.borrow().get(index).cloned();
            match listener {
                Some(listener) => listener.call(),
                None => break,
            }
        }
    }
}

impl<S: 'static, A: 'static> StoreApi<S, A> for Store<S, A> {
    fn get_state(&self) -> Rc<S> {
        Store::get_state(self)
    }

    fn dispatch(&self, action: A) -> A {
        Store::dispatch(self, action)
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        Store::subscribe(self, listener)
    }

    fn dispatcher(&self) -> Dispatch<A> {
        Store::dispatcher(self)
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
