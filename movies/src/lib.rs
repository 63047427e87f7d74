//! # Movie Tracker
//!
//! Browse upcoming movies, register, and keep the last user's favorites
//! around across restarts.
//!
//! The application is a unidirectional state container: slice reducers fold
//! [`AppAction`]s into [`AppState`], the bootstrap reducer describes the
//! network and storage work as effects, and the store runs them.
//!
//! ## Example
//!
//! ```no_run
//! use movie_tracker::{App, AppConfig, AppEnvironment, FileKeyValueStore, HttpGateway};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! let app = App::new(AppEnvironment::new(
//!     Arc::new(HttpGateway::new(config.catalog, config.backend)),
//!     Arc::new(FileKeyValueStore::new(config.session_file)),
//! ));
//!
//! app.mount().await?;
//! app.settle().await?;
//! println!("{} upcoming movies", app.snapshot().await.movies.len());
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod app;
pub mod config;
pub mod environment;
pub mod gateway;
pub mod reducers;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod wrangler;

pub use actions::AppAction;
pub use app::{App, AppError, AppStore};
pub use config::{AppConfig, BackendConfig, CatalogConfig, ConfigError};
pub use environment::AppEnvironment;
pub use gateway::{GatewayError, GatewayOperation, HttpGateway, MovieGateway};
#[cfg(any(test, feature = "test-utils"))]
pub use gateway::StubGateway;
pub use reducers::AppReducer;
pub use storage::FileKeyValueStore;
pub use types::{AppState, Movie, MovieId, NewUser, RawMovie, SessionPhase, User, UserId};
