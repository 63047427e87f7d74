//! Reducer composition utilities
//!
//! - **`combine_reducers`**: Run multiple reducers on the same state/action
//! - **`scope_reducer`**: Focus a reducer on one field (slice) of a larger state
//!
//! Together they build a root reducer out of independent slice reducers,
//! composed by key:
//!
//! ```
//! use movie_tracker_core::composition::{combine_reducers, scope_reducer};
//! use movie_tracker_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug)]
//! enum Action {
//!     SetTitles(Vec<String>),
//!     SetLoggedIn(bool),
//! }
//!
//! #[derive(Default)]
//! struct AppState {
//!     titles: Vec<String>,
//!     logged_in: bool,
//! }
//!
//! struct TitlesReducer;
//! struct LoginReducer;
//!
//! impl Reducer for TitlesReducer {
//!     type State = Vec<String>;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Vec<String>, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::SetTitles(titles) = action {
//!             *state = titles;
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! impl Reducer for LoginReducer {
//!     type State = bool;
//!     type Action = Action;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut bool, action: Action, _env: &()) -> SmallVec<[Effect<Action>; 4]> {
//!         if let Action::SetLoggedIn(value) = action {
//!             *state = value;
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let root = combine_reducers(vec![
//!     scope_reducer(TitlesReducer, |s: &mut AppState| &mut s.titles).boxed(),
//!     scope_reducer(LoginReducer, |s: &mut AppState| &mut s.logged_in).boxed(),
//! ]);
//!
//! let mut state = AppState::default();
//! root.reduce(&mut state, Action::SetLoggedIn(true), &());
//! assert!(state.logged_in);
//! assert!(state.titles.is_empty());
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;
use smallvec::SmallVec;
use std::sync::Arc;

/// A shareable, type-erased reducer over `(S, A, E)`
pub type SharedReducer<S, A, E> =
    Arc<dyn Reducer<State = S, Action = A, Environment = E> + Send + Sync>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer is run in order, and all effects are collected and concatenated.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<SharedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    A: Clone,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E> {
    reducers: Vec<SharedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E> {
    /// Number of reducers in the combination
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether the combination is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Clone for CombinedReducer<S, A, E> {
    fn clone(&self) -> Self {
        Self {
            reducers: self.reducers.clone(),
        }
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

/// Scopes a reducer to operate on one field of a larger state.
///
/// `lens` selects the slice the child reducer owns; the rest of the parent
/// state is never visible to it.
pub fn scope_reducer<S, SubS, A, E, R>(reducer: R, lens: fn(&mut S) -> &mut SubS) -> ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer { reducer, lens }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, R> {
    reducer: R,
    lens: fn(&mut S) -> &mut SubS,
}

impl<S, SubS, R> ScopedReducer<S, SubS, R> {
    /// Erase the concrete type so the reducer can go into [`combine_reducers`]
    #[must_use]
    pub fn boxed<A, E>(self) -> SharedReducer<S, A, E>
    where
        R: Reducer<State = SubS, Action = A, Environment = E> + Send + Sync + 'static,
        S: 'static,
        SubS: 'static,
        A: 'static,
        E: 'static,
    {
        Arc::new(self)
    }
}

impl<S, SubS, R: Clone> Clone for ScopedReducer<S, SubS, R> {
    fn clone(&self) -> Self {
        Self {
            reducer: self.reducer.clone(),
            lens: self.lens,
        }
    }
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, R>
where
    R: Reducer<State = SubS, Action = A, Environment = E>,
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
        self.reducer.reduce((self.lens)(state), action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smallvec;

    #[derive(Clone, Default)]
    struct TestState {
        counter: i32,
        name: String,
    }

    #[derive(Clone)]
    enum TestAction {
        Increment,
        Decrement,
        SetName(String),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = i32;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => *state += 1,
                TestAction::Decrement => *state -= 1,
                TestAction::SetName(_) => {},
            }
            smallvec![Effect::None]
        }
    }

    struct NameReducer;

    impl Reducer for NameReducer {
        type State = String;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            if let TestAction::SetName(name) = action {
                *state = name;
            }
            smallvec![Effect::None]
        }
    }

    fn root() -> CombinedReducer<TestState, TestAction, ()> {
        combine_reducers(vec![
            scope_reducer(CounterReducer, |s: &mut TestState| &mut s.counter).boxed(),
            scope_reducer(NameReducer, |s: &mut TestState| &mut s.name).boxed(),
        ])
    }

    #[test]
    fn test_combine_scoped_reducers() {
        let combined = root();
        let mut state = TestState::default();

        let _ = combined.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(state.counter, 1);

        let _ = combined.reduce(&mut state, TestAction::SetName("Alice".to_string()), &());
        assert_eq!(state.name, "Alice");

        let _ = combined.reduce(&mut state, TestAction::Decrement, &());
        assert_eq!(state.counter, 0);
        assert_eq!(state.name, "Alice");
    }

    #[test]
    fn test_effects_are_concatenated_in_order() {
        let combined = root();
        let mut state = TestState::default();

        let effects = combined.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(effects.len(), combined.len());
    }

    #[test]
    fn test_scope_leaves_other_fields_alone() {
        let scoped = scope_reducer(CounterReducer, |s: &mut TestState| &mut s.counter);
        let mut state = TestState {
            counter: 5,
            name: "test".to_string(),
        };

        let _ = scoped.reduce(&mut state, TestAction::Increment, &());
        assert_eq!(state.counter, 6);
        assert_eq!(state.name, "test");
    }

    #[test]
    fn test_empty_combination_is_identity() {
        let combined: CombinedReducer<TestState, TestAction, ()> = combine_reducers(vec![]);
        let mut state = TestState::default();

        let effects = combined.reduce(&mut state, TestAction::Increment, &());
        assert!(combined.is_empty());
        assert!(effects.is_empty());
        assert_eq!(state.counter, 0);
    }
}
