use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::scalar::string_or_scalar;

/// LoggingConfig controls how we initialize tracing/logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LoggingConfig {
    #[serde(default = "default_level", deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub level: String, // e.g. "info", "debug", "warn"
    #[serde(default = "default_format", deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub format: String, // e.g. "json", "console"
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "console".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_level(),
            format: default_format(),
        }
    }
}
