//! `reqwest` implementation of [`MovieGateway`]

use super::{GatewayError, MovieGateway};
use crate::config::{BackendConfig, CatalogConfig};
use crate::types::{MovieId, NewUser, RawMovie, UserId};
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Catalog page envelope
#[derive(Debug, Deserialize)]
struct UpcomingPage {
    results: Vec<RawMovie>,
}

/// The favorites endpoint is owned by the backend; these are the shapes it
/// is known to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FavoritesPayload {
    Bare(Vec<FavoriteEntry>),
    Envelope {
        #[serde(alias = "favorites")]
        data: Vec<FavoriteEntry>,
    },
}

/// A favorites row is a bare id or a record. Stored rows carry their own
/// `id` next to `movie_id`, so `movie_id` wins when both are present.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FavoriteEntry {
    Id(i64),
    Record {
        #[serde(default)]
        movie_id: Option<i64>,
        #[serde(default)]
        id: Option<i64>,
    },
}

impl FavoriteEntry {
    fn movie_id(self) -> Option<MovieId> {
        match self {
            Self::Id(id) => Some(MovieId::new(id)),
            Self::Record { movie_id, id } => movie_id.or(id).map(MovieId::new),
        }
    }
}

impl FavoritesPayload {
    fn into_ids(self) -> Vec<MovieId> {
        let (Self::Bare(entries) | Self::Envelope { data: entries }) = self;
        entries.into_iter().filter_map(FavoriteEntry::movie_id).collect()
    }
}

/// Gateway talking to the real catalog and backend over HTTP
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    catalog: CatalogConfig,
    backend: BackendConfig,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("catalog_root", &self.catalog.root)
            .field("language", &self.catalog.language)
            .field("backend_root", &self.backend.root)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Create a gateway with a default `reqwest` client
    #[must_use]
    pub fn new(catalog: CatalogConfig, backend: BackendConfig) -> Self {
        Self::with_client(Client::new(), catalog, backend)
    }

    /// Create a gateway around an existing client
    #[must_use]
    pub const fn with_client(client: Client, catalog: CatalogConfig, backend: BackendConfig) -> Self {
        Self {
            client,
            catalog,
            backend,
        }
    }

    fn upcoming_url(&self) -> String {
        format!("{}movie/upcoming", self.catalog.root)
    }

    fn favorites_url(&self, user_id: UserId) -> String {
        format!("{}api/users/{user_id}/favorites", self.backend.root)
    }

    fn new_user_url(&self) -> String {
        format!("{}api/users/new/", self.backend.root)
    }

    /// Send `request` and decode a 2xx JSON body as `T`
    async fn round_trip<T: DeserializeOwned>(url: &str, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request.send().await.map_err(|e| GatewayError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| GatewayError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| GatewayError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl MovieGateway for HttpGateway {
    #[tracing::instrument(skip(self), name = "fetch_upcoming_movies")]
    fn fetch_upcoming_movies(&self) -> BoxFuture<'_, Result<Vec<RawMovie>, GatewayError>> {
        Box::pin(async move {
            let url = self.upcoming_url();
            let request = self.client.get(&url).query(&[
                ("api_key", self.catalog.api_key.as_str()),
                ("language", self.catalog.language.as_str()),
            ]);

            let page: UpcomingPage = Self::round_trip(&url, request).await?;
            tracing::debug!(count = page.results.len(), "Fetched upcoming movies");
            Ok(page.results)
        })
    }

    #[tracing::instrument(skip(self), name = "fetch_favorites")]
    fn fetch_favorites(&self, user_id: UserId) -> BoxFuture<'_, Result<Vec<MovieId>, GatewayError>> {
        Box::pin(async move {
            let url = self.favorites_url(user_id);
            let payload: FavoritesPayload = Self::round_trip(&url, self.client.get(&url)).await?;
            let favorites = payload.into_ids();
            tracing::debug!(%user_id, count = favorites.len(), "Fetched favorites");
            Ok(favorites)
        })
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email), name = "submit_new_user")]
    fn submit_new_user<'a>(
        &'a self,
        user: &'a NewUser,
    ) -> BoxFuture<'a, Result<serde_json::Value, GatewayError>> {
        Box::pin(async move {
            let url = self.new_user_url();
            let body = serde_json::json!({
                "email": user.email,
                "password": user.password,
                "name": user.name,
            });
            let request = self
                .client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .json(&body);

            Self::round_trip(&url, request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> HttpGateway {
        HttpGateway::new(
            CatalogConfig {
                root: "https://catalog.test/3/".to_string(),
                api_key: "secret".to_string(),
                language: "en-US".to_string(),
            },
            BackendConfig {
                root: "http://backend.test/".to_string(),
            },
        )
    }

    #[test]
    fn test_urls() {
        let gateway = gateway();
        assert_eq!(gateway.upcoming_url(), "https://catalog.test/3/movie/upcoming");
        assert_eq!(
            gateway.favorites_url(UserId::new(4)),
            "http://backend.test/api/users/4/favorites"
        );
        assert_eq!(gateway.new_user_url(), "http://backend.test/api/users/new/");
    }

    #[test]
    fn test_debug_does_not_print_api_key() {
        assert!(!format!("{:?}", gateway()).contains("secret"));
    }

    #[test]
    fn test_favorites_payload_shapes() {
        let parse = |json: &str| {
            serde_json::from_str::<FavoritesPayload>(json)
                .map(FavoritesPayload::into_ids)
                .ok()
        };
        let expected = Some(vec![MovieId::new(1), MovieId::new(2)]);

        assert_eq!(parse("[1, 2]"), expected);
        assert_eq!(parse(r#"{"data": [1, 2]}"#), expected);
        assert_eq!(parse(r#"{"favorites": [{"movie_id": 1}, {"movie_id": 2}]}"#), expected);
        assert_eq!(parse(r#"[{"id": 1}, {"id": 2, "title": "ignored"}]"#), expected);
        assert_eq!(
            parse(r#"{"data": [{"id": 30, "movie_id": 1, "user_id": 9}, {"movie_id": 2, "id": 31}]}"#),
            expected
        );
        assert_eq!(parse(r#"[{"title": "no id"}, 1, 2]"#), expected);
        assert_eq!(parse(r#"{"status": "ok"}"#), None);
    }
}
