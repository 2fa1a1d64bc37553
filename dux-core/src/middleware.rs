//! Store enhancement: routing dispatch through middleware

use std::fmt;
use std::rc::Rc;

use crate::store::{Dispatch, Listener, Reducer, Store, StoreApi, Unsubscribe};

/// Intercepts actions on their way to the reducer
///
/// A middleware receives the base store, the dispatch function to continue
/// with (`next`), and the action. It decides whether and how to call `next`,
/// and returns the action that the enhanced `dispatch` hands back.
///
/// Implemented for closures of the matching shape:
///
/// ```
/// use dux_core::{apply_middleware, create_store, Dispatch, EnhancedStore, Store};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Add(i32);
///
/// fn sum(state: &i32, action: &Add) -> i32 {
///     state + action.0
/// }
///
/// // Doubles every amount before the reducer sees it
/// let doubler =
///     |_: &Store<i32, Add>, next: &Dispatch<Add>, action: Add| next.call(Add(action.0 * 2));
///
/// let store: EnhancedStore<i32, Add> = apply_middleware(doubler).enhance(create_store)(sum);
/// assert_eq!(store.dispatch(Add(3)), Add(6));
/// assert_eq!(*store.get_state(), 6);
/// ```
pub trait Middleware<S, A> {
    /// Handle one dispatched action
    fn handle(&self, store: &Store<S, A>, next: &Dispatch<A>, action: A) -> A;
}

impl<S, A, F> Middleware<S, A> for F
where
    F: Fn(&Store<S, A>, &Dispatch<A>, A) -> A,
{
    fn handle(&self, store: &Store<S, A>, next: &Dispatch<A>, action: A) -> A {
        self(store, next, action)
    }
}

/// A store whose `dispatch` runs through middleware
///
/// `get_state` and `subscribe` are the base store's. `dispatch` calls the
/// middleware with the base store and the base store's dispatch as `next`.
pub struct EnhancedStore<S, A> {
    store: Store<S, A>,
    dispatch: Dispatch<A>,
}

impl<S, A> Clone for EnhancedStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S: 'static, A: 'static> EnhancedStore<S, A> {
    /// Wrap `store` so its dispatch goes through `middleware`
    pub fn new(store: Store<S, A>, middleware: impl Middleware<S, A> + 'static) -> Self {
        let base = store.clone();
        let next = store.dispatcher();
        let dispatch = Dispatch::new(move |action| middleware.handle(&base, &next, action));
        Self { store, dispatch }
    }

    /// Get the current state
    pub fn get_state(&self) -> Rc<S> {
        self.store.get_state()
    }

    /// Dispatch an action through the middleware
    pub fn dispatch(&self, action: A) -> A {
        self.dispatch.call(action)
    }

    /// Register a listener on the base store
    pub fn subscribe(&self, listener: impl Into<Listener>) -> Unsubscribe {
        self.store.subscribe(listener)
    }

    /// The enhanced dispatch as a standalone function value
    pub fn dispatcher(&self) -> Dispatch<A> {
        self.dispatch.clone()
    }

    /// The store underneath the middleware
    pub fn base(&self) -> &Store<S, A> {
        &self.store
    }
}

impl<S: 'static, A: 'static> StoreApi<S, A> for EnhancedStore<S, A> {
    fn get_state(&self) -> Rc<S> {
        EnhancedStore::get_state(self)
    }

    fn dispatch(&self, action: A) -> A {
        EnhancedStore::dispatch(self, action)
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        EnhancedStore::subscribe(self, listener)
    }

    fn dispatcher(&self) -> Dispatch<A> {
        EnhancedStore::dispatcher(self)
    }
}

impl<S: fmt::Debug, A> fmt::Debug for EnhancedStore<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnhancedStore")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Store enhancer returned by [`apply_middleware`]
pub struct ApplyMiddleware<M> {
    middleware: M,
}

/// Build a store enhancer that routes dispatch through `middleware`
///
/// `apply_middleware(m).enhance(create_store)` gives back a store constructor
/// taking the reducer. It accepts a single middleware, which always receives
/// the base store's dispatch as `next`; wrap several in a
/// [`ComposedMiddleware`] to chain them.
pub fn apply_middleware<M>(middleware: M) -> ApplyMiddleware<M> {
    ApplyMiddleware { middleware }
}

impl<M> ApplyMiddleware<M> {
    /// Wrap a store constructor
    pub fn enhance<S, A, R, C>(self, create_store: C) -> impl FnOnce(R) -> EnhancedStore<S, A>
    where
        S: 'static,
        A: 'static,
        R: Reducer<S, A>,
        C: FnOnce(R) -> Store<S, A>,
        M: Middleware<S, A> + 'static,
    {
        move |reducer| EnhancedStore::new(create_store(reducer), self.middleware)
    }
}

impl<M> fmt::Debug for ApplyMiddleware<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyMiddleware").finish_non_exhaustive()
    }
}

/// Chain several middleware into one
///
/// Middleware run in the order they were added: the first sees the action
/// first, and its `next` calls the second. The last one's `next` is the
/// dispatch the chain itself was given.
pub struct ComposedMiddleware<S, A> {
    middlewares: Vec<Rc<dyn Middleware<S, A>>>,
}

impl<S, A> fmt::Debug for ComposedMiddleware<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedMiddleware")
            .field("middlewares_count", &self.middlewares.len())
            .finish()
    }
}

impl<S, A> Default for ComposedMiddleware<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> ComposedMiddleware<S, A> {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Append a middleware to the chain
    pub fn add<M: Middleware<S, A> + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Rc::new(middleware));
    }

    /// Builder form of [`add`](Self::add)
    pub fn with<M: Middleware<S, A> + 'static>(mut self, middleware: M) -> Self {
        self.add(middleware);
        self
    }

    /// Number of middleware in the chain
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

fn chain_from<S: 'static, A: 'static>(
    middlewares: Rc<[Rc<dyn Middleware<S, A>>]>,
    index: usize,
    store: Store<S, A>,
    last: Dispatch<A>,
) -> Dispatch<A> {
    if index >= middlewares.len() {
        return last;
    }
    Dispatch::new(move |action| {
        let next = chain_from(
            Rc::clone(&middlewares),
            index + 1,
            store.clone(),
            last.clone(),
        );
        middlewares[index].handle(&store, &next, action)
    })
}

impl<S: 'static, A: 'static> Middleware<S, A> for ComposedMiddleware<S, A> {
    fn handle(&self, store: &Store<S, A>, next: &Dispatch<A>, action: A) -> A {
        let middlewares: Rc<[Rc<dyn Middleware<S, A>>]> = self.middlewares.clone().into();
        chain_from(middlewares, 0, store.clone(), next.clone()).call(action)
    }
}
