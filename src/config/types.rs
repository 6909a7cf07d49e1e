use std::time::Duration;

use serde::Deserialize;

use crate::args::{OutputFormat, parse_duration_value};
use crate::assets::ExtractMode;
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    #[serde(alias = "concurrency")]
    pub users: Option<usize>,
    #[serde(alias = "sec")]
    pub duration: Option<u64>,
    pub header: Option<String>,
    pub cookies: Option<String>,
    pub user_agent: Option<String>,
    pub return_body: Option<bool>,
    pub timeout: Option<DurationValue>,
    pub max_connections: Option<usize>,
    pub parser: Option<ExtractMode>,
    pub warmup: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output: Option<String>,
    pub no_color: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
