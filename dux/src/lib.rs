//! dux: single-store, reducer-driven state management
//!
//! One store owns the application state. The state only changes when an
//! action is dispatched: a pure reducer computes the next state, the store
//! swaps it in, and every subscribed listener runs.
//!
//! # Example
//! ```
//! use dux::prelude::*;
//!
//! #[derive(Action, Clone, Debug, PartialEq)]
//! #[action(creators)]
//! enum CounterAction {
//!     Increment,
//!     Add(i32),
//! }
//!
//! #[derive(CombineReducers, Clone, Debug, Default, PartialEq)]
//! #[combine(action = CounterAction)]
//! struct AppState {
//!     #[reducer(count)]
//!     count: i32,
//!     #[reducer(dispatches)]
//!     dispatches: usize,
//! }
//!
//! fn count(state: &i32, action: &CounterAction) -> i32 {
//!     match action {
//!         CounterAction::Increment => state + 1,
//!         CounterAction::Add(n) => state + n,
//!     }
//! }
//!
//! fn dispatches(state: &usize, _action: &CounterAction) -> usize {
//!     state + 1
//! }
//!
//! let store = Store::new(AppState::default(), AppState::reduce);
//! let actions = CounterActionCreators::new(store.dispatcher());
//!
//! actions.increment();
//! assert_eq!(actions.add(5), CounterAction::Add(5));
//! assert_eq!(*store.get_state(), AppState { count: 6, dispatches: 2 });
//! ```

// Re-export everything from core
pub use dux_core::*;

// Re-export derive macros
pub use dux_macros::{Action, CombineReducers};

/// Prelude for convenient imports
pub mod prelude {
    // Traits
    pub use dux_core::{Action, Middleware, Reducer, StoreApi};

    // Store
    pub use dux_core::{create_store, Dispatch, Listener, Store, Unsubscribe};

    // Combinator
    pub use dux_core::{combine_reducers, defaulted, slice, CombinedReducer, Slices};

    // Middleware
    pub use dux_core::{apply_middleware, ComposedMiddleware, EnhancedStore, LoggingMiddleware};

    // Binder
    pub use dux_core::{bind_action_creators, BoundActionCreator, BoundActionCreators};

    // Derive macros
    pub use dux_macros::{Action, CombineReducers};
}
