//! Tracing setup for embedders and tests.
//!
//! The engine itself only emits `tracing` events; installing a subscriber
//! is the embedder's call. [`init`] wires up the common case: an
//! env-filtered fmt subscriber on stderr, defaulting to `info` for this
//! crate when `RUST_LOG` is unset.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the default subscriber. Safe to call more than once; later
/// calls are no-ops (the first subscriber wins).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trellis=info"));
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_reentrant() {
        init();
        init();
    }
}
