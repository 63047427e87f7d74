//! The `"Last User"` session slot.
//!
//! One JSON-serialized [`User`] under one key of the injected
//! [`KeyValueStore`]. Read once at mount, written whenever a user with a
//! fresh id is captured.

use crate::types::User;
use movie_tracker_core::environment::{KeyValueStore, StorageError};
use thiserror::Error;

/// Storage key of the cached user
pub const SESSION_KEY: &str = "Last User";

/// Errors reading or writing the session slot
#[derive(Debug, Error)]
pub enum SessionError {
    /// The storage itself failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The slot does not hold a user record
    #[error("Session record is not a user: {0}")]
    Corrupt(String),

    /// The slot holds a user whose id cannot key a favorites lookup
    #[error("Session record has non-positive user id {0}")]
    InvalidUserId(i64),
}

/// Read the cached user
///
/// Returns `Ok(None)` when nothing is stored.
///
/// # Errors
///
/// Returns [`SessionError`] if storage fails, the record does not parse, or
/// its id is not positive.
pub fn load(storage: &dyn KeyValueStore) -> Result<Option<User>, SessionError> {
    let Some(record) = storage.get(SESSION_KEY)? else {
        return Ok(None);
    };

    let user: User =
        serde_json::from_str(&record).map_err(|e| SessionError::Corrupt(e.to_string()))?;

    if !user.id.is_concrete() {
        return Err(SessionError::InvalidUserId(user.id.get()));
    }

    Ok(Some(user))
}

/// Cache `user` in the slot, replacing what was there
///
/// # Errors
///
/// Returns [`SessionError::Storage`] if the write fails.
pub fn save(storage: &dyn KeyValueStore, user: &User) -> Result<(), SessionError> {
    let record = serde_json::to_string(user).map_err(|e| SessionError::Corrupt(e.to_string()))?;
    storage.set(SESSION_KEY, &record)?;
    Ok(())
}
