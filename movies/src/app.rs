//! The root controller a host drives: mount, log in and out, register.
//!
//! [`App`] owns the [`Store`] running the [`AppReducer`]. Hosts read state
//! through [`App::snapshot`] and wait for the effect cascade of an operation
//! with [`App::settle`].

use crate::actions::{self, AppAction};
use crate::environment::AppEnvironment;
use crate::gateway::GatewayOperation;
use crate::reducers::{AppReducer, registered_id};
use crate::types::{AppState, NewUser, User};
use movie_tracker_runtime::{Store, StoreError};
use std::time::Duration;
use thiserror::Error;

/// The store type behind [`App`]
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// Default wait for effects to finish
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced to the host
#[derive(Debug, Error)]
pub enum AppError {
    /// The store rejected the action or timed out
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The backend refused the registration or could not be reached
    #[error("Registration failed: {0}")]
    Registration(String),
}

/// Root controller over the application store
///
/// Cloning is cheap and shares the store.
#[derive(Clone)]
pub struct App {
    store: AppStore,
    settle_timeout: Duration,
}

impl App {
    /// Create an unmounted app over `environment`
    #[must_use]
    pub fn new(environment: AppEnvironment) -> Self {
        Self {
            store: Store::new(AppState::default(), AppReducer::new(), environment),
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    /// Override how long [`App::settle`] and [`App::register`] wait
    #[must_use]
    pub const fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// The underlying store, for observers
    #[must_use]
    pub const fn store(&self) -> &AppStore {
        &self.store
    }

    /// Start up: load upcoming movies and restore the cached session
    ///
    /// Returns once the loads are started; see [`App::settle`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] after teardown.
    #[tracing::instrument(skip(self))]
    pub async fn mount(&self) -> Result<(), AppError> {
        self.store.send(AppAction::Mount).await?;
        Ok(())
    }

    /// Wait until every in-flight effect and its follow-ups are done
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if effects are still running after the
    /// settle timeout.
    pub async fn settle(&self) -> Result<(), AppError> {
        self.store.settle(self.settle_timeout).await?;
        Ok(())
    }

    /// Log out: the login status becomes `false`
    ///
    /// The user, favorites, movies and the session slot are kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] after teardown.
    #[tracing::instrument(skip(self))]
    pub async fn log_out(&self) -> Result<(), AppError> {
        self.store.send(AppAction::LogOut).await?;
        Ok(())
    }

    /// Make `user` the current user
    ///
    /// If the previous user was unset or had id zero, the user is cached in
    /// the session slot and their favorites are fetched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] after teardown.
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn capture_user(&self, user: User) -> Result<(), AppError> {
        self.store.send(actions::capture_user(user)).await?;
        Ok(())
    }

    /// Capture `user` and mark them logged in
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] after teardown.
    pub async fn log_in(&self, user: User) -> Result<(), AppError> {
        self.capture_user(user).await?;
        self.store.send(actions::change_login_status(true)).await?;
        Ok(())
    }

    /// Register `new_user` with the backend
    ///
    /// Returns the registered user when the backend answers with an id; that
    /// user is then captured and logged in. `Ok(None)` means the backend
    /// accepted the request without naming the user.
    ///
    /// # Errors
    ///
    /// - [`AppError::Registration`]: the backend call failed
    /// - [`AppError::Store`]: no answer within the settle timeout, or the
    ///   app was torn down
    #[tracing::instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn register(&self, new_user: NewUser) -> Result<Option<User>, AppError> {
        let outcome = self
            .store
            .send_and_wait_for(
                AppAction::Register(new_user),
                |action| {
                    matches!(
                        action,
                        AppAction::UserRegistered { .. }
                            | AppAction::RequestFailed {
                                operation: GatewayOperation::SubmitNewUser,
                                ..
                            }
                    )
                },
                self.settle_timeout,
            )
            .await?;

        match outcome {
            AppAction::UserRegistered { user, response } => {
                Ok(registered_id(&response).map(|id| user.into_user(id)))
            },
            AppAction::RequestFailed { message, .. } => Err(AppError::Registration(message)),
            _ => Ok(None),
        }
    }

    /// A copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.store.state(AppState::clone).await
    }

    /// Tear down: reject further dispatches and drop the results of effects
    /// still in flight, waiting up to `timeout` for them to finish
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if effects are still running at the
    /// timeout.
    pub async fn teardown(&self, timeout: Duration) -> Result<(), AppError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("settle_timeout", &self.settle_timeout)
            .field("pending_effects", &self.store.pending_effects())
            .finish_non_exhaustive()
    }
}
