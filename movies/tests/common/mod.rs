//! Shared fixtures for the integration tests.

#![allow(dead_code)] // each test binary uses a subset

use movie_tracker::session::SESSION_KEY;
use movie_tracker::{App, AppEnvironment, NewUser, RawMovie, StubGateway, User, UserId};
use movie_tracker_testing::InMemoryKeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// An app wired to a stub gateway and in-memory storage, both kept for
/// inspection
pub struct Harness {
    pub app: App,
    pub gateway: Arc<StubGateway>,
    pub storage: Arc<InMemoryKeyValueStore>,
}

pub fn harness(gateway: StubGateway, storage: InMemoryKeyValueStore) -> Harness {
    movie_tracker_testing::init_test_tracing();

    let gateway = Arc::new(gateway);
    let storage = Arc::new(storage);
    let environment = AppEnvironment::new(gateway.clone(), storage.clone());

    Harness {
        app: App::new(environment).with_settle_timeout(Duration::from_secs(5)),
        gateway,
        storage,
    }
}

pub fn taco(id: i64) -> User {
    NewUser::new("Taco", "taco@taco", "taco").into_user(UserId::new(id))
}

/// Storage whose session slot holds `user`
pub fn stored(user: &User) -> InMemoryKeyValueStore {
    let record = serde_json::to_string(user).unwrap_or_default();
    InMemoryKeyValueStore::with_entry(SESSION_KEY, &record)
}

pub fn raw_movie(id: i64, title: &str) -> RawMovie {
    RawMovie {
        id,
        title: title.to_string(),
        overview: Some(format!("About {title}")),
        poster_path: Some(format!("/{id}.jpg")),
    }
}
