//! Core types for dux
//!
//! This crate provides a minimal single-store state container in the
//! Redux style: one state value, replaced (never mutated) by a pure reducer on
//! every dispatched action, with listeners notified after each change.
//!
//! # Core Concepts
//!
//! - **Action**: A value describing an intended state change
//! - **Reducer**: A pure function `(&state, &action) -> next state`
//! - **Store**: Owns the state and the listeners; `get_state`, `dispatch`, `subscribe`
//! - **Combinator**: Builds one reducer from named slice reducers
//! - **Middleware**: Wraps a store's dispatch
//! - **Bound action creators**: Action constructors that dispatch what they build
//!
//! # Basic Example
//!
//! ```
//! use dux_core::prelude::*;
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! fn reducer(state: &i32, action: &CounterAction) -> i32 {
//!     match action {
//!         CounterAction::Increment => state + 1,
//!         CounterAction::Decrement => state - 1,
//!     }
//! }
//!
//! let store = create_store(reducer);
//! let reader = store.clone();
//! store.subscribe(move || println!("count: {}", reader.get_state()));
//!
//! store.dispatch(CounterAction::Increment);
//! store.dispatch(CounterAction::Increment);
//! assert_eq!(*store.get_state(), 2);
//! ```
//!
//! # Threading
//!
//! Stores are single-threaded (`Rc`-based). Every dispatch, reducer call and
//! listener notification runs synchronously to completion on the calling
//! thread. Feed actions produced elsewhere (async tasks, input pollers) back
//! through a channel and dispatch them from the thread that owns the store.

pub mod action;
pub mod bind;
pub mod combine;
pub mod logging;
pub mod middleware;
pub mod store;
pub mod testing;

// Core trait exports
pub use action::Action;

// Store exports
pub use store::{create_store, Dispatch, Listener, Reducer, Store, StoreApi, Unsubscribe};

// Combinator exports
pub use combine::{combine_reducers, defaulted, slice, CombinedReducer, SliceReducer, Slices};

// Middleware exports
pub use logging::{ActionLoggerConfig, LoggingMiddleware};
pub use middleware::{
    apply_middleware, ApplyMiddleware, ComposedMiddleware, EnhancedStore, Middleware,
};

// Binder exports
pub use bind::{bind_action_creators, BoundActionCreator, BoundActionCreators};

// Testing exports
pub use testing::{ActionRecorder, ListenerProbe};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::bind::{bind_action_creators, BoundActionCreator, BoundActionCreators};
    pub use crate::combine::{
        combine_reducers, defaulted, slice, CombinedReducer, SliceReducer, Slices,
    };
    pub use crate::logging::{ActionLoggerConfig, LoggingMiddleware};
    pub use crate::middleware::{
        apply_middleware, ApplyMiddleware, ComposedMiddleware, EnhancedStore, Middleware,
    };
    pub use crate::store::{create_store, Dispatch, Listener, Reducer, Store, StoreApi, Unsubscribe};
}
