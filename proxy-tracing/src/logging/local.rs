// std
use std::{io::Write, path::PathBuf};
// crates
use serde::{Deserialize, Serialize};
use tracing_appender::{non_blocking::WorkerGuard, rolling::Rotation};
use tracing_subscriber::fmt::{
    format::{DefaultFields, Format},
    Layer,
};
// internal

pub type FmtLayer<S> = Layer<S, DefaultFields, Format, tracing_appender::non_blocking::NonBlocking>;

const DEFAULT_LOG_FILE: &str = "da-proxy.log";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<FileRotation> for Rotation {
    fn from(rotation: FileRotation) -> Self {
        match rotation {
            FileRotation::Hourly => Rotation::HOURLY,
            FileRotation::Daily => Rotation::DAILY,
            FileRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    pub directory: PathBuf,
    pub prefix: Option<PathBuf>,
    #[serde(default)]
    pub rotation: FileRotation,
}

pub fn create_file_layer<S>(config: FileConfig) -> (FmtLayer<S>, WorkerGuard) {
    let file_appender = tracing_appender::rolling::RollingFileAppender::new(
        config.rotation.into(),
        config.directory,
        config
            .prefix
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
    );

    let (layer, guard) = create_writer_layer(file_appender);
    (layer.with_ansi(false), guard)
}

pub fn create_writer_layer<S, W>(writer: W) -> (FmtLayer<S>, WorkerGuard)
where
    W: Write + Send + 'static,
{
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);

    let layer = tracing_subscriber::fmt::Layer::new()
        .with_level(true)
        .with_writer(non_blocking);

    (layer, guard)
}
