// std
use std::collections::BTreeMap;
// crates
use serde::{Deserialize, Serialize};
use tracing_subscriber::{filter::ParseError, EnvFilter};
// internal

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFilterConfig {
    /// Map from crate/module name to the desired log level.
    /// More: https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives
    pub filters: BTreeMap<String, String>,
}

pub fn create_envfilter_layer(config: EnvFilterConfig) -> Result<EnvFilter, ParseError> {
    let filter_string = config
        .filters
        .into_iter()
        .map(|(target, level)| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",");

    EnvFilter::try_new(filter_string)
}
