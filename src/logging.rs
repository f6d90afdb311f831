//! Tracing subscriber setup for the binary. Logs go to stderr so command output
//! on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Safe to call more than once.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true),
    );
    if subscriber.try_init().is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
