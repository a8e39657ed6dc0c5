pub mod filter;
pub mod logging;
pub mod panic;

// std
use std::panic as std_panic;
// crates
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};
// internal
use crate::filter::envfilter::{create_envfilter_layer, EnvFilterConfig};
use crate::logging::local::{create_file_layer, create_writer_layer, FileConfig};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoggerLayer {
    File(FileConfig),
    Stdout,
    Stderr,
    // do not collect logs
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterLayer {
    EnvFilter(EnvFilterConfig),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingSettings {
    pub logger: LoggerLayer,
    #[serde(default = "default_filter")]
    pub filter: FilterLayer,
    #[serde(with = "serde_level")]
    pub level: Level,
}

fn default_filter() -> FilterLayer {
    FilterLayer::None
}

impl Default for TracingSettings {
    fn default() -> Self {
        Self {
            logger: LoggerLayer::Stdout,
            filter: FilterLayer::None,
            level: Level::INFO,
        }
    }
}

impl TracingSettings {
    #[inline]
    #[must_use]
    pub const fn new(logger: LoggerLayer, filter: FilterLayer, level: Level) -> Self {
        Self {
            logger,
            filter,
            level,
        }
    }
}

#[derive(Error, Debug)]
pub enum TracingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("Failed to install the global subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the background log writer alive. Pending lines are flushed when it is dropped.
#[must_use = "dropping the guard stops the log writer"]
pub struct TracingGuard {
    _logger_guard: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config` and route panics through it.
///
/// Fails if a global subscriber is already set.
pub fn init(config: TracingSettings) -> Result<TracingGuard, TracingError> {
    let mut layers: Vec<Box<dyn tracing_subscriber::Layer<_> + Send + Sync>> = vec![];

    let logger_guard = match config.logger {
        LoggerLayer::File(config) => {
            let (layer, guard) = create_file_layer(config);
            layers.push(Box::new(layer));
            Some(guard)
        }
        LoggerLayer::Stdout => {
            let (layer, guard) = create_writer_layer(std::io::stdout());
            layers.push(Box::new(layer));
            Some(guard)
        }
        LoggerLayer::Stderr => {
            let (layer, guard) = create_writer_layer(std::io::stderr());
            layers.push(Box::new(layer));
            Some(guard)
        }
        LoggerLayer::None => None,
    };

    if let FilterLayer::EnvFilter(config) = config.filter {
        let filter_layer = create_envfilter_layer(config)?;
        layers.push(Box::new(filter_layer));
    }

    // If no layers are created, tracing subscriber is not required.
    if layers.is_empty() {
        return Ok(TracingGuard {
            _logger_guard: None,
        });
    }

    tracing_subscriber::registry()
        .with(LevelFilter::from(config.level))
        .with(layers)
        .try_init()?;

    std_panic::set_hook(Box::new(panic::panic_hook));
    Ok(TracingGuard {
        _logger_guard: logger_guard,
    })
}

mod serde_level {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::Level;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        <String>::deserialize(deserializer).and_then(|v| {
            v.parse()
                .map_err(|e| D::Error::custom(format!("invalid log level {e}")))
        })
    }

    #[expect(
        clippy::trivially_copy_pass_by_ref,
        reason = "Signature must match serde requirement."
    )]
    pub fn serialize<S>(value: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.as_str().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn settings_from_yaml() {
        let settings: TracingSettings = serde_yaml::from_str(
            r#"
logger: !File
  directory: /var/log/da-proxy
  rotation: hourly
filter: !EnvFilter
  filters:
    da_proxy_store: debug
level: WARN
"#,
        )
        .unwrap();
        let LoggerLayer::File(file) = &settings.logger else {
            panic!("unexpected logger {:?}", settings.logger);
        };
        assert_eq!(file.directory, PathBuf::from("/var/log/da-proxy"));
        assert_eq!(file.prefix, None);
        assert_eq!(file.rotation, logging::local::FileRotation::Hourly);
        assert!(matches!(settings.filter, FilterLayer::EnvFilter(_)));
        assert_eq!(settings.level, Level::WARN);
    }

    #[test]
    fn level_round_trips_as_string() {
        let settings = TracingSettings::new(LoggerLayer::Stderr, FilterLayer::None, Level::DEBUG);
        let yaml = serde_yaml::to_string(&settings).unwrap();
        assert!(yaml.contains("level: DEBUG"));
        assert_eq!(
            serde_yaml::from_str::<TracingSettings>(&yaml).unwrap(),
            settings
        );
        assert!(serde_yaml::from_str::<TracingSettings>("logger: Stdout\nlevel: LOUD\n").is_err());
    }

    #[test]
    fn no_layers_skips_the_subscriber() {
        let settings = TracingSettings::new(LoggerLayer::None, FilterLayer::None, Level::INFO);
        assert!(init(settings).is_ok());
    }
}
