//! Rust-side log output for the host app.
//!
//! Events go to stderr, where the iOS/Android console captures them, so
//! ANSI colouring is off. Only this workspace's crates log at `info` by
//! default; `WALLET_CORE_LOG` (then `RUST_LOG`) overrides the filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

pub const LOG_ENV: &str = "WALLET_CORE_LOG";

const DEFAULT_DIRECTIVES: &str = "warn,wallet_core=info,chain_ada=info";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the subscriber. `json` emits one object per line for log
/// collectors; otherwise a compact single-line text format.
///
/// Later calls are no-ops: the host app may call this on every launch.
pub fn init_logging(json: bool) {
    let registry = Registry::default().with(filter());
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if installed.is_ok() {
        tracing::debug!(json, "wallet-core logging installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_does_not_panic() {
        init_logging(false);
        init_logging(true);
    }

    #[test]
    fn default_directives_parse() {
        assert!(DEFAULT_DIRECTIVES.parse::<EnvFilter>().is_ok());
    }
}
