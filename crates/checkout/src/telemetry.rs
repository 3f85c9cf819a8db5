//! Logging and error tracking setup.
//!
//! The host application calls [`init`] once at startup and keeps the
//! returned guard alive for as long as events should reach Sentry.

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CheckoutConfig;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "checkout_storefront=info";

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CheckoutConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO | tracing::Level::DEBUG => {
            sentry_tracing::EventFilter::Breadcrumb
        }
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install Sentry (when a DSN is configured) and the global tracing subscriber.
///
/// Sentry is initialized first so the tracing layer can forward events to
/// it. If a global subscriber is already installed it is left in place.
#[must_use]
pub fn init(config: &CheckoutConfig) -> Option<sentry::ClientInitGuard> {
    let guard = init_sentry(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .try_init();

    match installed {
        Ok(()) => tracing::info!(sentry = guard.is_some(), "Telemetry initialized"),
        Err(err) => tracing::debug!(error = %err, "Tracing subscriber already installed"),
    }

    guard
}

/// Route log output through the test harness' captured writer.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn try_init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    #[test]
    fn test_no_sentry_without_dsn() {
        let config = CheckoutConfig::new(Url::parse("http://localhost:8080/api").unwrap());
        assert!(init_sentry(&config).is_none());
    }

    #[test]
    fn test_try_init_for_tests_is_idempotent() {
        try_init_for_tests();
        try_init_for_tests();
        tracing::debug!("still logging");
    }
}
