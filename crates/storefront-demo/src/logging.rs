//! Subscriber setup for the demo binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Filter directives, `tracing_subscriber` syntax.
pub const LOG_ENV: &str = "STOREFRONT_LOG";
/// `json` switches both logs and error reports to JSON lines.
pub const LOG_FORMAT_ENV: &str = "STOREFRONT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if value == "json" => Self::Json,
            _ => Self::Plain,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber, writing to stderr so stdout stays clean for
/// command output. A second call is a no-op.
pub fn init(format: LogFormat) {
    let filter = filter_from(std::env::var(LOG_ENV).ok().as_deref());
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Plain => builder.try_init(),
    };
}
