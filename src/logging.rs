//! Process-wide `tracing` subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV_VAR: &str = "CI_CHECKS_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Pick the filter directive: `--verbose` wins, then the environment, then `warn`.
fn directive(verbose: bool, from_env: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    from_env
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

pub fn env_filter(verbose: bool) -> EnvFilter {
    let directive = directive(verbose, std::env::var(LOG_ENV_VAR).ok());
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init(verbose: bool, json: bool) {
    let filter = env_filter(verbose);

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("warning: logging already initialized: {}", e);
    }
}
