//! Action trait for describing state transitions

use std::fmt::Debug;

/// Marker trait for values that can be dispatched to a store
///
/// Actions describe an intended state change. The store imposes no structure
/// on them beyond:
/// - Clone: middleware may record or forward an action it also passes on
/// - Debug: for logging
/// - 'static: actions are held by type-erased dispatch functions
///
/// Use `#[derive(Action)]` from `dux-macros` to implement this for an enum.
pub trait Action: Clone + Debug + 'static {
    /// The action's kind, used for logging and filtering
    fn name(&self) -> &'static str;
}
