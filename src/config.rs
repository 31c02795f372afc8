//! Typed configuration, replacing the source's loose options object.

use std::time::Duration;

use crate::dispatcher::DEFAULT_PUBLISHING_INTERVAL;

/// Which [`crate::logger::Logger`] `StoreBuilder::start` should bind if the
/// caller hasn't supplied one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoggerKind {
    /// Bind no logger; dispatch retries and recovery are silent.
    #[default]
    None,
    /// Bind [`crate::logger::TracingLogger`]. This is what the spec's
    /// `logger: 'console'` configuration literal maps onto.
    Console,
}

impl std::str::FromStr for LoggerKind {
    type Err = UnknownLoggerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(LoggerKind::Console),
            "none" | "" => Ok(LoggerKind::None),
            other => Err(UnknownLoggerKind(other.to_owned())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown logger kind: `{0}` (expected \"console\" or \"none\")")]
pub struct UnknownLoggerKind(String);

/// Store-level configuration: the Dispatcher's poll interval and which
/// default logger to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub publishing_interval: Duration,
    pub logger: LoggerKind,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            publishing_interval: DEFAULT_PUBLISHING_INTERVAL,
            logger: LoggerKind::None,
        }
    }
}

impl StoreConfig {
    pub fn with_publishing_interval(mut self, interval: Duration) -> Self {
        self.publishing_interval = interval;
        self
    }

    pub fn with_logger(mut self, logger: LoggerKind) -> Self {
        self.logger = logger;
        self
    }

    /// Loads overrides from the environment:
    /// `EVENTSTORE_PUBLISHING_INTERVAL_MS` (integer milliseconds) and
    /// `EVENTSTORE_LOGGER` (`"console"` or `"none"`). Unset variables fall
    /// back to [`StoreConfig::default`]; this is additive application
    /// framing, not part of the core's hard path.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("EVENTSTORE_PUBLISHING_INTERVAL_MS") {
            let millis: u64 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("EVENTSTORE_PUBLISHING_INTERVAL_MS must be an integer, got `{raw}`"))?;
            config.publishing_interval = Duration::from_millis(millis);
        }

        if let Ok(raw) = std::env::var("EVENTSTORE_LOGGER") {
            config.logger = raw.parse()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.publishing_interval, DEFAULT_PUBLISHING_INTERVAL);
        assert_eq!(config.logger, LoggerKind::None);
    }

    #[test]
    fn logger_kind_parses_console_literal() {
        assert_eq!("console".parse::<LoggerKind>().unwrap(), LoggerKind::Console);
        assert!("nonsense".parse::<LoggerKind>().is_err());
    }
}
