//! Logging and error tracking setup.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log filter (default: `catalog_sync=info,...`)
//! - `LOG_FORMAT` - `json` for one JSON object per event, text otherwise
//! - `SENTRY_DSN` - Sentry error tracking DSN (disabled when unset)
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str =
    "catalog_sync=info,catalog_sync_shopify=info,catalog_sync_cli=info";

/// Telemetry settings read from the environment.
#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    /// Emit JSON instead of human-readable text
    pub json: bool,
    /// Error tracking is off without a DSN
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    /// Share of error events sent, 0.0 to 1.0
    pub sentry_sample_rate: f32,
}

impl TelemetryConfig {
    /// Read telemetry settings. Never fails; unparsable values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            json: std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            sentry_dsn: std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty()),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
            sentry_sample_rate: std::env::var("SENTRY_SAMPLE_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
        }
    }
}

fn init_sentry(config: &TelemetryConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Failed rows become Sentry events. Skips and not-found rows log at warn
/// and info, so they only ride along as breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the global subscriber (and Sentry, when configured).
///
/// The returned guard flushes pending Sentry events when dropped, so it
/// must outlive the run.
pub fn init(config: &TelemetryConfig) -> Option<sentry::ClientInitGuard> {
    // Sentry must be initialized before the subscriber picks up its layer
    let guard = init_sentry(config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let json_layer = config
        .json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.json).then(tracing_subscriber::fmt::layer);
    let sentry_layer = guard
        .is_some()
        .then(|| sentry_tracing::layer().event_filter(sentry_event_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_layer)
        .init();

    if guard.is_some() {
        tracing::info!(
            environment = config.sentry_environment.as_deref(),
            "Error tracking enabled"
        );
    }
    guard
}
