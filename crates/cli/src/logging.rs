//! Diagnostics for the `statekit` binary.
//!
//! Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr in compact
//! form so stdout stays a clean JSON document.
//!
//! ```bash
//! RUST_LOG=sk_core=debug statekit run release
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
