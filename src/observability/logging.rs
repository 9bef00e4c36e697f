//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from settings
//! - Pick the default filter from the debug flag
//! - Provide a bare subscriber for errors raised before settings exist
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the default filter

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{LogFormat, Settings};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "aceflow_geo_api=debug,tower_http=debug"
    } else {
        "aceflow_geo_api=info,tower_http=info"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(settings.debug).into());

    let output = match settings.log_format {
        LogFormat::Json => fmt::layer().json().with_target(false).boxed(),
        LogFormat::Pretty => fmt::layer().boxed(),
    };

    let installed = tracing_subscriber::registry().with(filter).with(output).try_init().is_ok();
    if installed {
        tracing::debug!(format = %settings.log_format, "Logging initialized");
    }
}

/// Subscriber for failures before settings are resolved.
pub fn init_fallback() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(false).into()))
        .with(fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_follows_debug() {
        assert!(default_filter(true).contains("aceflow_geo_api=debug"));
        assert!(default_filter(false).contains("aceflow_geo_api=info"));
    }

    #[test]
    fn test_init_is_idempotent() {
        let settings = Settings {
            log_format: LogFormat::Json,
            ..Settings::default()
        };
        init(&settings);
        init(&Settings::default());
        init_fallback();
    }
}
