//! Tracing setup for the binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "movie_tracker=debug,movie_tracker_runtime=info";

/// Install the global subscriber: `RUST_LOG` (or [`DEFAULT_FILTER`]) plus a
/// `fmt` layer on stderr
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
