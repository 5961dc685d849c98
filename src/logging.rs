//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence; otherwise the level follows the Ansible
//! output settings so `-vv` and `--debug` also make oct itself louder.

use crate::core::settings::AnsibleSettings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level implied by the output settings.
pub fn level_for(settings: &AnsibleSettings) -> &'static str {
    if settings.debug {
        return "debug";
    }
    match settings.verbosity {
        0 | 1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(settings: &AnsibleSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(settings)));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
    if installed.is_ok() {
        tracing::debug!(?settings, "logging initialized");
    }
}
