//! Everything that can happen to the application state.
//!
//! The five intents the slice reducers understand are built with the
//! creator functions below. The remaining variants drive the session
//! bootstrap: lifecycle intents from the host and results fed back by
//! effects.

use crate::gateway::GatewayOperation;
use crate::types::{Movie, MovieId, NewUser, User, UserId};

/// Actions processed by the [`AppReducer`](crate::reducers::AppReducer)
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    // Intents understood by the slice reducers
    /// Replace the movies slice
    LoadMovies(Vec<Movie>),
    /// Replace the current user
    CaptureUser(User),
    /// Clear the current user
    LogOutUser,
    /// Set the login status
    ChangeLoginStatus(bool),
    /// Replace the favorites slice
    LoadFavorites(Vec<MovieId>),

    // Lifecycle intents from the host
    /// Startup: load movies and restore the cached session
    Mount,
    /// Log-out operation: login status becomes `false`
    LogOut,
    /// Register a new user with the backend
    Register(NewUser),

    // Effect results
    /// The session slot held a user
    SessionRestored(User),
    /// The session slot was empty or unreadable
    SessionMissing,
    /// Favorites arrived for `user_id`
    FavoritesFetched {
        /// Whose favorites these are
        user_id: UserId,
        /// The favorites, in backend order
        favorites: Vec<MovieId>,
        /// Fetched as part of restoring a cached session
        restored: bool,
    },
    /// The backend accepted a registration
    UserRegistered {
        /// What was submitted
        user: NewUser,
        /// The backend's answer, as parsed JSON
        response: serde_json::Value,
    },
    /// A gateway call failed
    RequestFailed {
        /// Which call
        operation: GatewayOperation,
        /// Rendered [`GatewayError`](crate::gateway::GatewayError)
        message: String,
    },
}

/// Replace the loaded movies
#[must_use]
pub const fn load_movies(movies: Vec<Movie>) -> AppAction {
    AppAction::LoadMovies(movies)
}

/// Make `user` the current user
#[must_use]
pub const fn capture_user(user: User) -> AppAction {
    AppAction::CaptureUser(user)
}

/// Forget the current user
#[must_use]
pub const fn log_out_user() -> AppAction {
    AppAction::LogOutUser
}

/// Set whether the current user is logged in
#[must_use]
pub const fn change_login_status(logged_in: bool) -> AppAction {
    AppAction::ChangeLoginStatus(logged_in)
}

/// Replace the current user's favorites
#[must_use]
pub const fn load_favorites(favorites: Vec<MovieId>) -> AppAction {
    AppAction::LoadFavorites(favorites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creators_build_plain_actions() {
        let user = NewUser::new("Taco", "taco@taco", "taco").into_user(UserId::new(1));

        assert_eq!(load_movies(Vec::new()), AppAction::LoadMovies(Vec::new()));
        assert_eq!(capture_user(user.clone()), AppAction::CaptureUser(user));
        assert_eq!(log_out_user(), AppAction::LogOutUser);
        assert_eq!(change_login_status(true), AppAction::ChangeLoginStatus(true));
        assert_eq!(
            load_favorites(vec![MovieId::new(4)]),
            AppAction::LoadFavorites(vec![MovieId::new(4)])
        );
    }
}
