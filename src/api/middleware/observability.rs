//! Observability setup.
//!
//! Installs the global tracing subscriber.

use tracing_subscriber::EnvFilter;

/// Initialize tracing.
///
/// RUST_LOG controls the filter (default: info). LOG_FORMAT=json switches to
/// JSON lines. Output goes to stderr without ANSI colors.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    // an already-installed subscriber is left in place
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
