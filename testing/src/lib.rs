//! # Movie Tracker Testing
//!
//! Testing utilities and helpers for the movie tracker state container.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - The [`ReducerTest`] Given-When-Then harness
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use movie_tracker_testing::{InMemoryKeyValueStore, ReducerTest};
//!
//! ReducerTest::new(MoviesReducer)
//!     .with_env(test_environment())
//!     .given_state(Vec::new())
//!     .when_action(actions::load_movies(movies.clone()))
//!     .then_state(move |state| assert_eq!(state, &movies))
//!     .run();
//! ```

use movie_tracker_core::environment::{KeyValueStore, StorageError};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{KeyValueStore, StorageError};
    use std::collections::HashMap;
    use std::sync::{Mutex, PoisonError};

    /// In-memory key-value storage, the test double for browser local storage
    ///
    /// # Example
    ///
    /// ```
    /// use movie_tracker_core::environment::KeyValueStore;
    /// use movie_tracker_testing::mocks::InMemoryKeyValueStore;
    ///
    /// let storage = InMemoryKeyValueStore::new();
    /// storage.set("Last User", "{}").ok();
    /// assert_eq!(storage.get("Last User").ok().flatten().as_deref(), Some("{}"));
    /// ```
    #[derive(Debug, Default)]
    pub struct InMemoryKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
        writes: Mutex<Vec<String>>,
    }

    impl InMemoryKeyValueStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store holding a single entry
        #[must_use]
        pub fn with_entry(key: &str, value: &str) -> Self {
            let store = Self::new();
            store
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            store
        }

        /// Keys written through [`KeyValueStore::set`], in order
        #[must_use]
        pub fn writes(&self) -> Vec<String> {
            self.writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(key.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
            Ok(())
        }
    }

    /// Storage whose every operation fails with an I/O error
    #[derive(Debug, Default, Clone, Copy)]
    pub struct FailingKeyValueStore;

    impl KeyValueStore for FailingKeyValueStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io("storage unavailable".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("storage unavailable".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("storage unavailable".to_string()))
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `fmt` subscriber that writes through the test harness
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{FailingKeyValueStore, InMemoryKeyValueStore};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_round_trip() {
        let storage = InMemoryKeyValueStore::new();
        assert!(matches!(storage.get("missing"), Ok(None)));

        assert!(storage.set("k", "v1").is_ok());
        assert!(storage.set("k", "v2").is_ok());
        assert!(matches!(storage.get("k"), Ok(Some(v)) if v == "v2"));
        assert_eq!(storage.writes(), vec!["k".to_string(), "k".to_string()]);

        assert!(storage.remove("k").is_ok());
        assert!(matches!(storage.get("k"), Ok(None)));
    }

    #[test]
    fn test_seeded_entry_is_not_counted_as_write() {
        let storage = InMemoryKeyValueStore::with_entry("Last User", "{}");
        assert!(matches!(storage.get("Last User"), Ok(Some(_))));
        assert!(storage.writes().is_empty());
    }

    #[test]
    fn test_failing_store_fails() {
        let storage = FailingKeyValueStore;
        assert!(matches!(storage.get("k"), Err(StorageError::Io(_))));
        assert!(storage.set("k", "v").is_err());
    }
}
