use std::time::Duration;

use serde::Deserialize;

use crate::args::HttpMethod;
use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;

/// Contents of `loadprobe.toml` / `loadprobe.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub test: Option<TestConfig>,
    pub load: Option<LoadConfig>,
    pub proxy: Option<ProxyConfig>,
}

/// `[test]` section; keys mirror the `test` subcommand flags.
#[derive(Debug, Default, Deserialize)]
pub struct TestConfig {
    pub dest: Option<String>,
    pub workers: Option<usize>,
    pub limit: Option<u64>,
    pub method: Option<HttpMethod>,
    pub timeout: Option<u64>,
    pub request_timeout: Option<DurationValue>,
    pub header_size: Option<usize>,
    pub header_inc_rate: Option<usize>,
    pub header_multi_rate: Option<usize>,
    pub body_size: Option<usize>,
    pub body_inc_rate: Option<usize>,
    pub body_multi_rate: Option<usize>,
    pub body_from_file: Option<String>,
    pub max_payload: Option<usize>,
}

/// `[load]` section; keys mirror the `load` subcommand flags.
#[derive(Debug, Default, Deserialize)]
pub struct LoadConfig {
    pub list: Option<String>,
    pub workers: Option<usize>,
    pub timeout: Option<u64>,
    pub request_timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProxyConfig {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
