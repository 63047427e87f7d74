//! Slice reducers and the root [`AppReducer`].
//!
//! Each slice reducer owns one field of [`AppState`] and only replaces it
//! wholesale. The root reducer composes them by key and then runs the
//! session bootstrap: the only place effects are produced.

use crate::actions::{self, AppAction};
use crate::environment::AppEnvironment;
use crate::gateway::{GatewayError, GatewayOperation};
use crate::session;
use crate::types::{AppState, Movie, MovieId, SessionPhase, User, UserId};
use crate::wrangler::wrangle;
use movie_tracker_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use movie_tracker_core::{Effect, Reducer, SmallVec, async_effect, smallvec};
use std::sync::Arc;

/// Owns the loaded movies
#[derive(Clone, Copy, Debug, Default)]
pub struct MoviesReducer;

impl Reducer for MoviesReducer {
    type State = Vec<Movie>;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Vec<Movie>,
        action: AppAction,
        _env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        if let AppAction::LoadMovies(movies) = action {
            *state = movies;
        }
        SmallVec::new()
    }
}

/// Owns the current user's favorites
#[derive(Clone, Copy, Debug, Default)]
pub struct FavoritesReducer;

impl Reducer for FavoritesReducer {
    type State = Vec<MovieId>;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Vec<MovieId>,
        action: AppAction,
        _env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        if let AppAction::LoadFavorites(favorites) = action {
            *state = favorites;
        }
        SmallVec::new()
    }
}

/// Owns the current user
#[derive(Clone, Copy, Debug, Default)]
pub struct UserReducer;

impl Reducer for UserReducer {
    type State = Option<User>;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Option<User>,
        action: AppAction,
        _env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        match action {
            AppAction::CaptureUser(user) => *state = Some(user),
            AppAction::LogOutUser => *state = None,
            _ => {},
        }
        SmallVec::new()
    }
}

/// Owns the login status
#[derive(Clone, Copy, Debug, Default)]
pub struct LoginStatusReducer;

impl Reducer for LoginStatusReducer {
    type State = bool;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut bool,
        action: AppAction,
        _env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        if let AppAction::ChangeLoginStatus(logged_in) = action {
            *state = logged_in;
        }
        SmallVec::new()
    }
}

/// Root reducer: the slices composed by key, then the session bootstrap
///
/// # Bootstrap
///
/// ```text
/// Mount ──┬─ fetch movies ─► LoadMovies
///         └─ read slot ─┬─► SessionMissing ─► LoggedOut
///                       └─► SessionRestored ─► (CacheChecked) ─► CaptureUser
///                                 └─ fetch favorites ─► LoadFavorites ─► ChangeLoginStatus(true)
/// ```
///
/// Capturing a user whose id replaces an unset or zero id persists the user
/// to the session slot and fetches their favorites. The one capture a restore
/// issues is exempt; later captures follow the rule even if the restore's
/// favorites fetch failed and left the phase at `CacheChecked`.
#[derive(Clone)]
pub struct AppReducer {
    slices: CombinedReducer<AppState, AppAction, AppEnvironment>,
}

impl Default for AppReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl AppReducer {
    /// Compose the four slice reducers over [`AppState`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            slices: combine_reducers(vec![
                scope_reducer(MoviesReducer, |s: &mut AppState| &mut s.movies).boxed(),
                scope_reducer(FavoritesReducer, |s: &mut AppState| &mut s.favorites).boxed(),
                scope_reducer(UserReducer, |s: &mut AppState| &mut s.user).boxed(),
                scope_reducer(LoginStatusReducer, |s: &mut AppState| &mut s.logged_in).boxed(),
            ]),
        }
    }

    #[allow(clippy::too_many_lines)] // one arm per bootstrap transition
    fn bootstrap(
        state: &mut AppState,
        action: AppAction,
        previous_user: Option<UserId>,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        match action {
            AppAction::Mount => {
                if state.mounted {
                    tracing::warn!("Ignoring repeated mount");
                    return SmallVec::new();
                }
                state.mounted = true;

                smallvec![Effect::merge(vec![fetch_movies(env), read_session(env)])]
            },

            AppAction::SessionRestored(user) => {
                tracing::info!(user_id = %user.id, "Restoring cached session");
                state.phase = SessionPhase::CacheChecked;
                state.restore_capture = Some(user.id);
                let user_id = user.id;

                smallvec![Effect::chain(vec![
                    Effect::send(actions::capture_user(user)),
                    fetch_favorites(env, user_id, true),
                ])]
            },

            AppAction::SessionMissing => {
                tracing::info!("No cached session");
                state.phase = SessionPhase::LoggedOut;
                SmallVec::new()
            },

            AppAction::CaptureUser(user) => {
                let from_restore = state.restore_capture == Some(user.id);
                if from_restore {
                    state.restore_capture = None;
                }
                let was_unset = !previous_user.is_some_and(UserId::is_concrete);
                if was_unset && user.id.is_concrete() && !from_restore {
                    tracing::debug!(user_id = %user.id, "New user captured, refreshing session");
                    let user_id = user.id;
                    smallvec![Effect::merge(vec![
                        persist_session(env, user),
                        fetch_favorites(env, user_id, false),
                    ])]
                } else {
                    SmallVec::new()
                }
            },

            AppAction::FavoritesFetched {
                user_id,
                favorites,
                restored,
            } => {
                if state.user_id() != Some(user_id) {
                    tracing::debug!(%user_id, "Dropping favorites for a user that is no longer current");
                    metrics::counter!("app.favorites.stale").increment(1);
                    return SmallVec::new();
                }

                let mut steps = vec![Effect::send(actions::load_favorites(favorites))];
                if restored {
                    steps.push(Effect::send(actions::change_login_status(true)));
                }
                smallvec![Effect::chain(steps)]
            },

            AppAction::ChangeLoginStatus(logged_in) => {
                state.phase = if logged_in {
                    SessionPhase::LoggedIn
                } else {
                    SessionPhase::LoggedOut
                };
                SmallVec::new()
            },

            AppAction::LogOut => {
                smallvec![Effect::send(actions::change_login_status(false))]
            },

            AppAction::Register(new_user) => {
                let gateway = Arc::clone(&env.gateway);
                smallvec![async_effect! {
                    match gateway.submit_new_user(&new_user).await {
                        Ok(response) => {
                            tracing::info!(%response, "Registration answered");
                            Some(AppAction::UserRegistered { user: new_user, response })
                        },
                        Err(error) => Some(request_failed(GatewayOperation::SubmitNewUser, &error)),
                    }
                }]
            },

            AppAction::UserRegistered { user, response } => match registered_id(&response) {
                Some(id) => {
                    smallvec![Effect::chain(vec![
                        Effect::send(actions::capture_user(user.into_user(id))),
                        Effect::send(actions::change_login_status(true)),
                    ])]
                },
                None => {
                    tracing::info!(email = %user.email, "Registration answer carries no user id");
                    SmallVec::new()
                },
            },

            AppAction::RequestFailed { operation, message } => {
                state.last_error = Some(format!("{operation}: {message}"));
                SmallVec::new()
            },

            AppAction::LoadMovies(_) | AppAction::LogOutUser | AppAction::LoadFavorites(_) => {
                SmallVec::new()
            },
        }
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        let previous_user = state.user_id();
        let mut effects = self.slices.reduce(state, action.clone(), env);
        effects.extend(Self::bootstrap(state, action, previous_user, env));
        effects
    }
}

/// The backend answers a registration with the stored user, either bare or
/// under `data`
pub(crate) fn registered_id(response: &serde_json::Value) -> Option<UserId> {
    response
        .get("id")
        .or_else(|| response.pointer("/data/id"))
        .and_then(serde_json::Value::as_i64)
        .map(UserId::new)
        .filter(|id| id.is_concrete())
}

fn request_failed(operation: GatewayOperation, error: &GatewayError) -> AppAction {
    tracing::warn!(%operation, %error, "Gateway call failed");
    metrics::counter!("app.gateway.failures", "operation" => operation.to_string()).increment(1);
    AppAction::RequestFailed {
        operation,
        message: error.to_string(),
    }
}

fn fetch_movies(env: &AppEnvironment) -> Effect<AppAction> {
    let gateway = Arc::clone(&env.gateway);
    async_effect! {
        match gateway.fetch_upcoming_movies().await {
            Ok(raw) => Some(actions::load_movies(wrangle(&raw))),
            Err(error) => Some(request_failed(GatewayOperation::FetchUpcomingMovies, &error)),
        }
    }
}

fn fetch_favorites(env: &AppEnvironment, user_id: UserId, restored: bool) -> Effect<AppAction> {
    let gateway = Arc::clone(&env.gateway);
    async_effect! {
        match gateway.fetch_favorites(user_id).await {
            Ok(favorites) => Some(AppAction::FavoritesFetched { user_id, favorites, restored }),
            Err(error) => Some(request_failed(GatewayOperation::FetchFavorites, &error)),
        }
    }
}

fn read_session(env: &AppEnvironment) -> Effect<AppAction> {
    let storage = Arc::clone(&env.storage);
    async_effect! {
        match session::load(&*storage) {
            Ok(Some(user)) => Some(AppAction::SessionRestored(user)),
            Ok(None) => Some(AppAction::SessionMissing),
            Err(error) => {
                tracing::warn!(%error, "Ignoring unreadable session record");
                Some(AppAction::SessionMissing)
            },
        }
    }
}

fn persist_session(env: &AppEnvironment, user: User) -> Effect<AppAction> {
    let storage = Arc::clone(&env.storage);
    async_effect! {
        if let Err(error) = session::save(&*storage, &user) {
            tracing::warn!(%error, user_id = %user.id, "Could not cache user");
        }
        None
    }
}
