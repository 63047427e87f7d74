//! In-memory [`MovieGateway`] with canned answers and a call log.
//!
//! Used by the test suites in place of the network.

use super::{GatewayError, MovieGateway};
use crate::types::{MovieId, NewUser, RawMovie, UserId};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// One recorded gateway invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    /// `fetch_upcoming_movies()`
    FetchUpcomingMovies,
    /// `fetch_favorites(user_id)`
    FetchFavorites(UserId),
    /// `submit_new_user(user)`
    SubmitNewUser(NewUser),
}

/// Canned-answer gateway
///
/// Unknown users have no favorites. Registration answers `{"id": <next id>}`
/// unless told otherwise.
#[derive(Debug)]
pub struct StubGateway {
    movies: Result<Vec<RawMovie>, GatewayError>,
    favorites: HashMap<UserId, Result<Vec<MovieId>, GatewayError>>,
    registration: Option<Result<serde_json::Value, GatewayError>>,
    next_user_id: i64,
    favorites_delay: Duration,
    calls: Mutex<Vec<GatewayCall>>,
}

impl Default for StubGateway {
    fn default() -> Self {
        Self {
            movies: Ok(Vec::new()),
            favorites: HashMap::new(),
            registration: None,
            next_user_id: 1,
            favorites_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubGateway {
    /// A gateway with no movies, no favorites, and accepting registrations
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `fetch_upcoming_movies` with `movies`
    #[must_use]
    pub fn with_movies(mut self, movies: Vec<RawMovie>) -> Self {
        self.movies = Ok(movies);
        self
    }

    /// Fail `fetch_upcoming_movies` with `error`
    #[must_use]
    pub fn with_movies_error(mut self, error: GatewayError) -> Self {
        self.movies = Err(error);
        self
    }

    /// Answer `fetch_favorites(user_id)` with `favorites`
    #[must_use]
    pub fn with_favorites(mut self, user_id: UserId, favorites: Vec<MovieId>) -> Self {
        self.favorites.insert(user_id, Ok(favorites));
        self
    }

    /// Fail `fetch_favorites(user_id)` with `error`
    #[must_use]
    pub fn with_favorites_error(mut self, user_id: UserId, error: GatewayError) -> Self {
        self.favorites.insert(user_id, Err(error));
        self
    }

    /// Answer every registration with `answer`
    #[must_use]
    pub fn with_registration(mut self, answer: Result<serde_json::Value, GatewayError>) -> Self {
        self.registration = Some(answer);
        self
    }

    /// Id handed to the next accepted registration
    #[must_use]
    pub const fn with_next_user_id(mut self, id: i64) -> Self {
        self.next_user_id = id;
        self
    }

    /// Hold every favorites answer back for `delay`
    #[must_use]
    pub const fn with_favorites_delay(mut self, delay: Duration) -> Self {
        self.favorites_delay = delay;
        self
    }

    /// Every call made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The user ids favorites were fetched for, in order
    #[must_use]
    pub fn favorites_requests(&self) -> Vec<UserId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::FetchFavorites(user_id) => Some(user_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GatewayCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl MovieGateway for StubGateway {
    fn fetch_upcoming_movies(&self) -> BoxFuture<'_, Result<Vec<RawMovie>, GatewayError>> {
        self.record(GatewayCall::FetchUpcomingMovies);
        let answer = self.movies.clone();
        Box::pin(async move { answer })
    }

    fn fetch_favorites(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<MovieId>, GatewayError>> {
        self.record(GatewayCall::FetchFavorites(user_id));
        let answer = self
            .favorites
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));
        let delay = self.favorites_delay;

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            answer
        })
    }

    fn submit_new_user<'a>(
        &'a self,
        user: &'a NewUser,
    ) -> BoxFuture<'a, Result<serde_json::Value, GatewayError>> {
        self.record(GatewayCall::SubmitNewUser(user.clone()));
        let answer = self
            .registration
            .clone()
            .unwrap_or_else(|| Ok(serde_json::json!({ "id": self.next_user_id })));
        Box::pin(async move { answer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_calls_in_order() {
        let gateway = StubGateway::new().with_favorites(UserId::new(1), vec![MovieId::new(9)]);

        let _ = gateway.fetch_upcoming_movies().await;
        let favorites = gateway.fetch_favorites(UserId::new(1)).await;
        let unknown = gateway.fetch_favorites(UserId::new(2)).await;

        assert_eq!(favorites, Ok(vec![MovieId::new(9)]));
        assert_eq!(unknown, Ok(Vec::new()));
        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::FetchUpcomingMovies,
                GatewayCall::FetchFavorites(UserId::new(1)),
                GatewayCall::FetchFavorites(UserId::new(2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_default_registration_answers_next_id() {
        let gateway = StubGateway::new().with_next_user_id(12);
        let answer = gateway
            .submit_new_user(&NewUser::new("Taco", "taco@taco", "taco"))
            .await;
        assert_eq!(answer, Ok(serde_json::json!({ "id": 12 })));
    }
}
