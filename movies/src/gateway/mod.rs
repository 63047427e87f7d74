//! Outbound calls: the movie catalog and the users/favorites backend.
//!
//! Every operation is one request/response round trip with no retry and no
//! caching. All three return the same [`GatewayError`] so callers can tell
//! success from failure.
//!
//! # Dyn Compatibility
//!
//! [`MovieGateway`] returns boxed futures instead of using `async fn` so it
//! can live in the environment as `Arc<dyn MovieGateway>` and be captured by
//! effects.

use crate::types::{MovieId, NewUser, RawMovie, UserId};
use futures::future::BoxFuture;
use thiserror::Error;

mod http;
#[cfg(any(test, feature = "test-utils"))]
pub mod stub;

pub use http::HttpGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use stub::{GatewayCall, StubGateway};

/// The three outbound operations, for logs and failure actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    /// `GET movie/upcoming` on the catalog
    FetchUpcomingMovies,
    /// `GET api/users/{id}/favorites` on the backend
    FetchFavorites,
    /// `POST api/users/new/` on the backend
    SubmitNewUser,
}

impl std::fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FetchUpcomingMovies => "fetch_upcoming_movies",
            Self::FetchFavorites => "fetch_favorites",
            Self::SubmitNewUser => "submit_new_user",
        };
        f.write_str(name)
    }
}

/// Errors from a gateway round trip
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never got a response (connection, TLS, body read)
    #[error("request to {url} failed: {message}")]
    Request {
        /// Requested URL
        url: String,
        /// Transport error
        message: String,
    },

    /// The server answered with a non-2xx status
    #[error("{url} answered {status}: {body}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The response body was not the expected JSON
    #[error("could not decode response from {url}: {message}")]
    Decode {
        /// Requested URL
        url: String,
        /// Parser error
        message: String,
    },
}

/// The outbound operations the application performs
pub trait MovieGateway: Send + Sync {
    /// Fetch the catalog's upcoming movies, raw
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, non-2xx status, or a
    /// body that is not `{"results": [...]}`.
    fn fetch_upcoming_movies(&self) -> BoxFuture<'_, Result<Vec<RawMovie>, GatewayError>>;

    /// Fetch the favorite movie ids of `user_id`
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, non-2xx status, or an
    /// unrecognised body.
    fn fetch_favorites(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<MovieId>, GatewayError>>;

    /// Register a user; returns the backend's parsed JSON answer
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] on transport failure, non-2xx status, or a
    /// body that is not JSON.
    fn submit_new_user<'a>(
        &'a self,
        user: &'a NewUser,
    ) -> BoxFuture<'a, Result<serde_json::Value, GatewayError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(GatewayOperation::FetchUpcomingMovies.to_string(), "fetch_upcoming_movies");
        assert_eq!(GatewayOperation::FetchFavorites.to_string(), "fetch_favorites");
        assert_eq!(GatewayOperation::SubmitNewUser.to_string(), "submit_new_user");
    }

    #[test]
    fn test_status_error_message() {
        let error = GatewayError::Status {
            url: "http://backend/api/users/new/".to_string(),
            status: 409,
            body: "taken".to_string(),
        };
        assert_eq!(error.to_string(), "http://backend/api/users/new/ answered 409: taken");
    }
}
