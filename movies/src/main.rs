//! Movie tracker demo host.
//!
//! Mounts the app against the configured catalog and backend, prints what
//! it loaded, and optionally registers a user or logs out.
//!
//! # Usage
//!
//! ```bash
//! TMDB_API_KEY=... cargo run --bin movie-tracker
//! TMDB_API_KEY=... cargo run --bin movie-tracker -- register "Taco" taco@taco secret
//! TMDB_API_KEY=... cargo run --bin movie-tracker -- logout
//! ```

use anyhow::{Context, bail};
use movie_tracker::telemetry::init_tracing;
use movie_tracker::{App, AppConfig, AppEnvironment, AppState, FileKeyValueStore, HttpGateway, NewUser};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!(
        catalog = %config.catalog.root,
        backend = %config.backend.root,
        session_file = %config.session_file.display(),
        "Starting movie tracker"
    );

    let environment = AppEnvironment::new(
        Arc::new(HttpGateway::new(config.catalog.clone(), config.backend.clone())),
        Arc::new(FileKeyValueStore::new(&config.session_file)),
    );
    let app = App::new(environment).with_settle_timeout(config.settle_timeout);

    app.mount().await?;
    app.settle().await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => {},
        ["register", name, email, password] => {
            match app.register(NewUser::new(*name, *email, *password)).await? {
                Some(user) => println!("Registered {} with id {}", user.name, user.id),
                None => println!("Registration sent; the backend did not return a user id"),
            }
            app.settle().await?;
        },
        ["logout"] => {
            app.log_out().await?;
            app.settle().await?;
        },
        other => bail!("unrecognised arguments {other:?}; expected `register NAME EMAIL PASSWORD` or `logout`"),
    }

    print_state(&app.snapshot().await);

    app.teardown(config.settle_timeout).await?;
    Ok(())
}

fn print_state(state: &AppState) {
    println!("Upcoming movies ({}):", state.movies.len());
    for movie in &state.movies {
        println!("  [{}] {}", movie.id, movie.title);
    }

    match &state.user {
        Some(user) => println!("User: {} <{}> (id {})", user.name, user.email, user.id),
        None => println!("User: none"),
    }
    println!("Logged in: {}", state.logged_in);

    let favorites = state.favorite_movies();
    println!(
        "Favorites: {} ids, {} among upcoming movies",
        state.favorites.len(),
        favorites.len()
    );
    for movie in favorites {
        println!("  [{}] {}", movie.id, movie.title);
    }

    if let Some(error) = &state.last_error {
        println!("Last error: {error}");
    }
}
