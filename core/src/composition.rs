//! Reducer composition utilities
//!
//! This module provides utilities for composing reducers:
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Embed a slice reducer into a parent state and action
//!
//! The admin store is assembled from one scoped reducer per content slice,
//! combined into a single root reducer:
//!
//! ```ignore
//! let root = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         AuthReducer,
//!         |state: &mut AdminState| &mut state.auth,
//!         AdminAction::into_auth,
//!         AdminAction::Auth,
//!     )),
//!     Box::new(scope_reducer(
//!         HeroReducer,
//!         |state: &mut AdminState| &mut state.hero,
//!         AdminAction::into_hero,
//!         AdminAction::Hero,
//!     )),
//! ]);
//! ```

use crate::SmallVec;
use crate::effect::Effect;
use crate::reducer::Reducer;
use std::marker::PhantomData;

/// Boxed reducer accepted by [`combine_reducers`].
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in sequence with its own clone of the action, and all
/// effects are collected and concatenated in reducer order.
///
/// # Examples
///
/// ```
/// use folio_core::composition::combine_reducers;
/// use folio_core::effect::Effect;
/// use folio_core::reducer::Reducer;
/// use folio_core::SmallVec;
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: i32,
///     logged: bool,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Increment,
///     Log,
/// }
///
/// struct CounterReducer;
/// struct LoggingReducer;
///
/// impl Reducer for CounterReducer {
///     type State = AppState;
///     type Action = AppAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
///         if matches!(action, AppAction::Increment) {
///             state.counter += 1;
///         }
///         SmallVec::new()
///     }
/// }
///
/// impl Reducer for LoggingReducer {
///     type State = AppState;
///     type Action = AppAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut AppState, action: AppAction, _env: &()) -> SmallVec<[Effect<AppAction>; 4]> {
///         if matches!(action, AppAction::Log) {
///             state.logged = true;
///         }
///         SmallVec::new()
///     }
/// }
///
/// let combined = combine_reducers(vec![Box::new(CounterReducer), Box::new(LoggingReducer)]);
///
/// let mut state = AppState::default();
/// let _ = combined.reduce(&mut state, AppAction::Increment, &());
/// assert_eq!(state.counter, 1);
/// assert!(!state.logged);
/// ```
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers combined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducers were combined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    A: Clone,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Scopes a slice reducer to a field of a parent state and a variant of a parent action.
///
/// - `state`: lens from the parent state to the slice state
/// - `extract`: pulls the slice action out of a parent action, `None` if the
///   action belongs to another slice
/// - `embed`: wraps a slice action produced by an effect back into the parent action
///
/// # Examples
///
/// ```
/// use folio_core::composition::scope_reducer;
/// use folio_core::effect::Effect;
/// use folio_core::reducer::Reducer;
/// use folio_core::SmallVec;
///
/// #[derive(Clone, Default)]
/// struct CounterState {
///     count: i32,
/// }
///
/// #[derive(Clone)]
/// enum CounterAction {
///     Increment,
/// }
///
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = CounterState;
///     type Action = CounterAction;
///     type Environment = ();
///
///     fn reduce(&self, state: &mut CounterState, action: CounterAction, _env: &()) -> SmallVec<[Effect<CounterAction>; 4]> {
///         match action {
///             CounterAction::Increment => state.count += 1,
///         }
///         SmallVec::new()
///     }
/// }
///
/// #[derive(Clone, Default)]
/// struct AppState {
///     counter: CounterState,
///     other_data: String,
/// }
///
/// #[derive(Clone)]
/// enum AppAction {
///     Counter(CounterAction),
///     Noop,
/// }
///
/// let scoped = scope_reducer(
///     CounterReducer,
///     |app: &mut AppState| &mut app.counter,
///     |action: AppAction| match action {
///         AppAction::Counter(inner) => Some(inner),
///         AppAction::Noop => None,
///     },
///     AppAction::Counter,
/// );
///
/// let mut state = AppState::default();
/// let _ = scoped.reduce(&mut state, AppAction::Counter(CounterAction::Increment), &());
/// let _ = scoped.reduce(&mut state, AppAction::Noop, &());
/// assert_eq!(state.counter.count, 1);
/// ```
#[must_use]
pub fn scope_reducer<S, A, R>(
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
) -> ScopedReducer<S, A, R>
where
    R: Reducer,
{
    ScopedReducer {
        reducer,
        state,
        extract,
        embed,
        _phantom: PhantomData,
    }
}

/// A reducer embedded into a parent state and action.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, A, R>
where
    R: Reducer,
{
    reducer: R,
    state: fn(&mut S) -> &mut R::State,
    extract: fn(A) -> Option<R::Action>,
    embed: fn(R::Action) -> A,
    _phantom: PhantomData<fn(S, A)>,
}

impl<S, A, R> Reducer for ScopedReducer<S, A, R>
where
    R: Reducer,
    R::Action: Send + 'static,
    A: 'static,
{
    type State = S;
    type Action = A;
    type Environment = R::Environment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let Some(action) = (self.extract)(action) else {
            return SmallVec::new();
        };

        self.reducer
            .reduce((self.state)(state), action, env)
            .into_iter()
            .map(|effect| effect.map(self.embed))
            .collect()
    }
}
