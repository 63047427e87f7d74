//! # Movie Tracker Core
//!
//! Core traits and types for the movie tracker state container.
//!
//! ## Core Concepts
//!
//! - **State**: Plain owned data describing one slice of the application
//! - **Action**: All possible inputs to a reducer (intents and effect results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```
//! use movie_tracker_core::{Effect, Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct MoviesState {
//!     titles: Vec<String>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum MoviesAction {
//!     Load(Vec<String>),
//! }
//!
//! struct MoviesReducer;
//!
//! impl Reducer for MoviesReducer {
//!     type State = MoviesState;
//!     type Action = MoviesAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut MoviesState,
//!         action: MoviesAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<MoviesAction>; 4]> {
//!         match action {
//!             MoviesAction::Load(titles) => state.titles = titles,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = MoviesState::default();
//! MoviesReducer.reduce(&mut state, MoviesAction::Load(vec!["Arrival".into()]), &());
//! assert_eq!(state.titles.len(), 1);
//! ```

// Re-export commonly used types
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Convenience macros for building effects
pub mod effect_macros;

/// Reducer module - The core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all state-transition logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns effect descriptions for the
        /// runtime to execute. Must not perform I/O itself.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially, each one (and the action it feeds back)
        /// finishing before the next starts
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Dispatch `action` back into the store without doing any work first
        #[must_use]
        pub fn send(action: Action) -> Effect<Action>
        where
            Action: Send + 'static,
        {
            Effect::Future(Box::pin(async move { Some(action) }))
        }

        /// Whether this effect does nothing at all
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().all(Effect::is_none)
                },
                Effect::Future(_) => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use thiserror::Error;

    /// Errors raised by a [`KeyValueStore`]
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// The backing medium could not be read or written
        #[error("Storage I/O error: {0}")]
        Io(String),

        /// The backing medium holds data that cannot be interpreted
        #[error("Storage is corrupt: {0}")]
        Corrupt(String),
    }

    /// Synchronous string key-value storage, the browser "local storage" shape
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - in-memory map
    /// let storage = InMemoryKeyValueStore::new();
    /// storage.set("Last User", r#"{"id":1}"#)?;
    /// assert!(storage.get("Last User")?.is_some());
    /// ```
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing medium cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Store `value` under `key`, replacing any previous value
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing medium cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

        /// Remove `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the backing medium cannot be written.
        fn remove(&self, key: &str) -> Result<(), StorageError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Ping,
    }

    #[test]
    fn none_effects_are_recognised_through_nesting() {
        let effect: Effect<TestAction> = Effect::merge(vec![
            Effect::None,
            Effect::chain(vec![Effect::None]),
        ]);
        assert!(effect.is_none());
    }

    #[test]
    fn future_effect_is_not_none() {
        let effect = Effect::chain(vec![Effect::None, Effect::send(TestAction::Ping)]);
        assert!(!effect.is_none());
    }

    #[tokio::test]
    async fn send_effect_resolves_to_action() {
        let Effect::Future(fut) = Effect::send(TestAction::Ping) else {
            unreachable!("send always builds a future effect");
        };
        assert_eq!(fut.await, Some(TestAction::Ping));
    }

    #[test]
    fn debug_hides_future_contents() {
        let effect = Effect::send(TestAction::Ping);
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");
    }
}
