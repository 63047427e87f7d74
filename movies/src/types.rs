//! Domain types: movies, users, and the application state.

use serde::{Deserialize, Serialize};

/// Catalog identifier of a movie
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    /// Creates a `MovieId` from the catalog's numeric id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric id
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend identifier of a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a `UserId` from the backend's numeric id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric id
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// A concrete id is strictly positive and can key a favorites lookup
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A movie record exactly as the catalog API returns it
///
/// Only the fields the wrangler reads are kept; everything else in the
/// catalog payload is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMovie {
    /// Catalog id
    pub id: i64,
    /// Display title
    #[serde(default)]
    pub title: String,
    /// Plot summary, absent for some unreleased titles
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster image path relative to the catalog's image root
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A normalized movie, the shape the state and any view consume
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Catalog id
    pub id: MovieId,
    /// Display title
    pub title: String,
    /// Plot summary (empty when the catalog has none)
    pub overview_text: String,
    /// Poster image path (empty when the catalog has none)
    pub poster_path: String,
}

/// A registered user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend id
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Password as the backend expects it
    pub password: String,
}

/// Registration payload for a user the backend has not assigned an id yet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

impl NewUser {
    /// Creates a registration payload
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// The user this registration becomes once the backend assigns `id`
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}

/// Where the session bootstrap currently stands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not mounted yet, or mounted and the session slot not read yet
    #[default]
    Uninitialized,
    /// A cached user was found and captured; favorites are loading
    CacheChecked,
    /// A user is authenticated in this session
    LoggedIn,
    /// No user is authenticated in this session
    LoggedOut,
}

/// The whole application state, one field per reducer slice plus
/// bootstrap bookkeeping
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Upcoming movies, replaced wholesale on each load
    pub movies: Vec<Movie>,
    /// Favorite movie ids of the current user, replaced wholesale
    pub favorites: Vec<MovieId>,
    /// The current user, if any
    pub user: Option<User>,
    /// Whether the current user is authenticated in this session
    pub logged_in: bool,
    /// Bootstrap state machine position
    pub phase: SessionPhase,
    /// Set once the mount sequence has started
    pub mounted: bool,
    /// The capture a session restore has issued and not yet seen reduced
    pub restore_capture: Option<UserId>,
    /// Most recent gateway failure, as `"<operation>: <message>"`
    pub last_error: Option<String>,
}

impl AppState {
    /// Id of the current user, if one is captured
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|user| user.id)
    }

    /// The favorites resolved against the loaded movies, in favorites order
    ///
    /// Ids with no loaded movie are skipped.
    #[must_use]
    pub fn favorite_movies(&self) -> Vec<&Movie> {
        self.favorites
            .iter()
            .filter_map(|id| self.movies.iter().find(|movie| movie.id == *id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> Movie {
        Movie {
            id: MovieId::new(id),
            title: format!("Movie {id}"),
            overview_text: String::new(),
            poster_path: String::new(),
        }
    }

    #[test]
    fn test_concrete_user_ids() {
        assert!(UserId::new(1).is_concrete());
        assert!(!UserId::new(0).is_concrete());
        assert!(!UserId::new(-4).is_concrete());
    }

    #[test]
    fn test_movie_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(movie(5)).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({
                "id": 5,
                "title": "Movie 5",
                "overviewText": "",
                "posterPath": "",
            }))
        );
    }

    #[test]
    fn test_user_reads_cached_record() {
        let user: Result<User, _> = serde_json::from_str(
            r#"{"name":"Taco","id":1,"email":"taco@taco","password":"taco"}"#,
        );
        assert!(matches!(user, Ok(u) if u.id == UserId::new(1) && u.name == "Taco"));
    }

    #[test]
    fn test_raw_movie_tolerates_missing_optional_fields() {
        let raw: Result<RawMovie, _> =
            serde_json::from_str(r#"{"id":3,"title":"T","poster_path":null,"vote_count":12}"#);
        assert!(matches!(raw, Ok(r) if r.overview.is_none() && r.poster_path.is_none()));
    }

    #[test]
    fn test_favorite_movies_follow_favorites_order_and_skip_unknown() {
        let state = AppState {
            movies: vec![movie(1), movie(2), movie(3)],
            favorites: vec![MovieId::new(3), MovieId::new(99), MovieId::new(1)],
            ..AppState::default()
        };

        let ids: Vec<i64> = state.favorite_movies().iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_new_user_into_user_keeps_fields() {
        let user = NewUser::new("Taco", "taco@taco", "burrito").into_user(UserId::new(8));
        assert_eq!(user.id, UserId::new(8));
        assert_eq!(user.email, "taco@taco");
        assert_eq!(user.password, "burrito");
    }
}
