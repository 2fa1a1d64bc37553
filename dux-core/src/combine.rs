//! Building one reducer out of named slice reducers

use std::collections::BTreeMap;
use std::fmt;

use crate::store::Reducer;

/// State produced by a [`CombinedReducer`]: slice name -> slice state
pub type Slices<V> = BTreeMap<String, V>;

/// A reducer for one named slice
///
/// Receives `None` when the previous state has no entry for the slice (the
/// first dispatch, or a key added after the state was built).
pub type SliceReducer<V, A> = Box<dyn Fn(Option<&V>, &A) -> V>;

/// Box a slice reducer
pub fn slice<V, A>(reducer: impl Fn(Option<&V>, &A) -> V + 'static) -> SliceReducer<V, A> {
    Box::new(reducer)
}

/// Box a slice reducer that starts from `V::default()` when the slice is absent
pub fn defaulted<V, A>(reducer: impl Fn(&V, &A) -> V + 'static) -> SliceReducer<V, A>
where
    V: Default + 'static,
    A: 'static,
{
    Box::new(move |state, action| match state {
        Some(state) => reducer(state, action),
        None => reducer(&V::default(), action),
    })
}

/// A reducer assembled from named slice reducers
///
/// On every call it builds a fresh map holding exactly one entry per
/// registered slice: `next[key] = reducer(previous.get(key), action)`.
/// Entries of the previous state with no registered reducer are dropped.
///
/// For struct-shaped state use `#[derive(CombineReducers)]` from `dux-macros`
/// instead; this type covers string-keyed state with a shared slice type.
pub struct CombinedReducer<V, A> {
    reducers: Vec<(String, SliceReducer<V, A>)>,
}

/// Combine slice reducers into one reducer over [`Slices`]
///
/// # Example
/// ```
/// use dux_core::{combine_reducers, create_store, slice, Slices, Store};
///
/// #[derive(Clone, Debug)]
/// struct Tick;
///
/// let reducer = combine_reducers([
///     ("ticks", slice(|s: Option<&u32>, _: &Tick| s.copied().unwrap_or(0) + 1)),
///     ("flag", slice(|_: Option<&u32>, _: &Tick| 1)),
/// ]);
///
/// let store: Store<Slices<u32>, Tick> = create_store(reducer);
/// store.dispatch(Tick);
/// store.dispatch(Tick);
/// assert_eq!(store.get_state()["ticks"], 2);
/// assert_eq!(store.get_state()["flag"], 1);
/// ```
pub fn combine_reducers<V, A, K>(
    reducers: impl IntoIterator<Item = (K, SliceReducer<V, A>)>,
) -> CombinedReducer<V, A>
where
    K: Into<String>,
{
    reducers
        .into_iter()
        .fold(CombinedReducer::new(), |combined, (key, reducer)| {
            combined.with_boxed(key, reducer)
        })
}

impl<V, A> Default for CombinedReducer<V, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, A> CombinedReducer<V, A> {
    /// Create a combined reducer with no slices
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Register a slice reducer under `key`
    ///
    /// Registering an existing key replaces its reducer.
    pub fn with(
        self,
        key: impl Into<String>,
        reducer: impl Fn(Option<&V>, &A) -> V + 'static,
    ) -> Self {
        self.with_boxed(key, Box::new(reducer))
    }

    fn with_boxed(mut self, key: impl Into<String>, reducer: SliceReducer<V, A>) -> Self {
        let key = key.into();
        match self.reducers.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = reducer,
            None => self.reducers.push((key, reducer)),
        }
        self
    }

    /// Slice names in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.reducers.iter().map(|(key, _)| key.as_str())
    }

    /// Number of registered slices
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no slices are registered
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<V, A> Reducer<Slices<V>, A> for CombinedReducer<V, A> {
    fn reduce(&self, state: &Slices<V>, action: &A) -> Slices<V> {
        self.reducers
            .iter()
            .map(|(key, reducer)| {
                let slice = reducer(state.get(key), action);
                (key.clone(), slice)
            })
            .collect()
    }
}

impl<V, A> fmt::Debug for CombinedReducer<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinedReducer")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
