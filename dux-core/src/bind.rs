//! Pre-binding action creators to a dispatch function

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::store::Dispatch;

/// An action creator whose result is dispatched automatically
///
/// Calling it is equivalent to `dispatch.call(creator(args))`.
pub struct BoundActionCreator<Args, A> {
    creator: Rc<dyn Fn(Args) -> A>,
    dispatch: Dispatch<A>,
}

impl<Args, A> BoundActionCreator<Args, A> {
    /// Bind one creator to `dispatch`
    pub fn new(creator: impl Fn(Args) -> A + 'static, dispatch: Dispatch<A>) -> Self {
        Self {
            creator: Rc::new(creator),
            dispatch,
        }
    }

    /// Build the action from `args`, dispatch it, and return what dispatch returned
    pub fn call(&self, args: Args) -> A {
        self.dispatch.call((self.creator)(args))
    }
}

impl<Args, A> Clone for BoundActionCreator<Args, A> {
    fn clone(&self) -> Self {
        Self {
            creator: Rc::clone(&self.creator),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<Args, A> fmt::Debug for BoundActionCreator<Args, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundActionCreator")
            .field("dispatch", &self.dispatch)
            .finish_non_exhaustive()
    }
}

/// A set of named, bound action creators
///
/// Creators that take several arguments take them as one `Args` value,
/// usually a tuple; creators without arguments take `()`.
pub struct BoundActionCreators<K, Args, A> {
    creators: BTreeMap<K, BoundActionCreator<Args, A>>,
}

/// Bind every creator in `creators` to `dispatch`
///
/// # Example
/// ```
/// use dux_core::{bind_action_creators, Store};
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Counter {
///     Add(i32),
///     Set(i32),
/// }
///
/// fn reducer(state: &i32, action: &Counter) -> i32 {
///     match action {
///         Counter::Add(n) => state + n,
///         Counter::Set(n) => *n,
///     }
/// }
///
/// let store = Store::new(0, reducer);
/// let actions = bind_action_creators(
///     [
///         ("add", Counter::Add as fn(i32) -> Counter),
///         ("set", Counter::Set),
///     ],
///     store.dispatcher(),
/// );
///
/// assert_eq!(actions.call("set", 5), Some(Counter::Set(5)));
/// assert_eq!(actions.call("add", 2), Some(Counter::Add(2)));
/// assert_eq!(*store.get_state(), 7);
/// ```
pub fn bind_action_creators<K, Args, A, F>(
    creators: impl IntoIterator<Item = (K, F)>,
    dispatch: Dispatch<A>,
) -> BoundActionCreators<K, Args, A>
where
    K: Ord,
    F: Fn(Args) -> A + 'static,
{
    let creators = creators
        .into_iter()
        .map(|(key, creator)| {
            let bound = BoundActionCreator::new(creator, dispatch.clone());
            (key, bound)
        })
        .collect();
    BoundActionCreators { creators }
}

impl<K: Ord, Args, A> BoundActionCreators<K, Args, A> {
    /// Look up a bound creator
    pub fn get<Q>(&self, key: &Q) -> Option<&BoundActionCreator<Args, A>>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.creators.get(key)
    }

    /// Call the creator registered under `key`
    ///
    /// Returns `None` without dispatching anything when no creator has that key.
    pub fn call<Q>(&self, key: &Q, args: Args) -> Option<A>
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).map(|creator| creator.call(args))
    }

    /// Iterate over the keys
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.creators.keys()
    }

    /// Number of bound creators
    pub fn len(&self) -> usize {
        self.creators.len()
    }

    /// Whether no creators are bound
    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

impl<K: Clone, Args, A> Clone for BoundActionCreators<K, Args, A> {
    fn clone(&self) -> Self {
        Self {
            creators: self.creators.clone(),
        }
    }
}

impl<K: fmt::Debug, Args, A> fmt::Debug for BoundActionCreators<K, Args, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundActionCreators")
            .field("keys", &self.creators.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use std::cell::RefCell;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Inc,
        Set(i32),
        Pair(i32, i32),
    }

    fn test_reducer(state: &i32, action: &TestAction) -> i32 {
        match action {
            TestAction::Inc => state + 1,
            TestAction::Set(n) => *n,
            TestAction::Pair(a, b) => a * b,
        }
    }

    fn set(n: i32) -> TestAction {
        TestAction::Set(n)
    }

    fn double(n: i32) -> TestAction {
        TestAction::Set(n * 2)
    }

    #[test]
    fn test_bound_call_matches_manual_dispatch() {
        let bound_store = Store::new(0, test_reducer);
        let manual_store = Store::new(0, test_reducer);

        let actions = bind_action_creators([("set", set)], bound_store.dispatcher());
        let dispatch = manual_store.dispatcher();

        assert_eq!(actions.call("set", 7), Some(dispatch.call(set(7))));
        assert_eq!(*bound_store.get_state(), *manual_store.get_state());
    }

    #[test]
    fn test_zero_argument_creator() {
        let store = Store::new(0, test_reducer);
        let actions = bind_action_creators([("inc", |()| TestAction::Inc)], store.dispatcher());

        actions.call("inc", ());
        actions.call("inc", ());
        assert_eq!(*store.get_state(), 2);
    }

    #[test]
    fn test_tuple_arguments() {
        let store = Store::new(0, test_reducer);
        let actions = bind_action_creators(
            [("pair", |(a, b): (i32, i32)| TestAction::Pair(a, b))],
            store.dispatcher(),
        );

        assert_eq!(actions.call("pair", (3, 4)), Some(TestAction::Pair(3, 4)));
        assert_eq!(*store.get_state(), 12);
    }

    #[test]
    fn test_fn_items_share_a_map() {
        let store = Store::new(0, test_reducer);
        let actions = bind_action_creators(
            [("set", set as fn(i32) -> TestAction), ("double", double)],
            store.dispatcher(),
        );

        assert_eq!(actions.len(), 2);
        let keys: Vec<_> = actions.keys().copied().collect();
        assert_eq!(keys, vec!["double", "set"]);

        actions.call("double", 5);
        assert_eq!(*store.get_state(), 10);
    }

    #[test]
    fn test_unknown_key_dispatches_nothing() {
        let store = Store::new(0, test_reducer);
        let dispatched = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&dispatched);
        store.subscribe(move || *counter.borrow_mut() += 1);

        let actions = bind_action_creators([("set", set)], store.dispatcher());
        assert_eq!(actions.call("missing", 1), None);
        assert!(actions.get("missing").is_none());
        assert_eq!(*dispatched.borrow(), 0);
    }

    #[test]
    fn test_bound_creator_outlives_map() {
        let store = Store::new(0, test_reducer);
        let single = {
            let actions = bind_action_creators([("set", set)], store.dispatcher());
            actions.get("set").cloned()
        };

        let single = single.expect("creator bound");
        assert_eq!(single.call(9), TestAction::Set(9));
        assert_eq!(*store.get_state(), 9);
    }

    #[test]
    fn test_binds_to_any_dispatch() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let dispatch = Dispatch::new(move |action: TestAction| {
            sink.borrow_mut().push(action.clone());
            action
        });

        let actions = bind_action_creators([("set", set)], dispatch);
        actions.call("set", 1);
        actions.call("set", 2);
        assert_eq!(*seen.borrow(), vec![TestAction::Set(1), TestAction::Set(2)]);
    }
}
