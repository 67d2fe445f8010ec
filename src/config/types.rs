use figment::providers::{Env, Format, Serialized, Yaml};
use figment::value::{Dict, Value};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::scalar::string_or_scalar;
use super::session::SessionConfig;

/// Top-level environment variables taken verbatim as strings.
const STRING_ENV: [&str; 7] = [
    "CLIENT_ID",
    "CLIENT_SECRET",
    "TENANT_ID",
    "AUTHORITY_HOST",
    "WEBSITE_HOSTNAME",
    "SCHEME",
    "JWT_TOKEN_SECRET",
];

/// Main config: OAuth client credentials, the externally visible address,
/// the session signing secret and the ambient sections.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub client_id: String,
    #[serde(deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub client_secret: String,
    #[serde(deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub tenant_id: String,
    #[serde(
        default = "default_authority_host",
        deserialize_with = "string_or_scalar"
    )]
    #[schemars(with = "String")]
    pub authority_host: String,
    #[serde(
        default = "default_website_hostname",
        deserialize_with = "string_or_scalar"
    )]
    #[schemars(with = "String")]
    pub website_hostname: String,
    #[serde(default = "default_scheme", deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub scheme: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(deserialize_with = "string_or_scalar")]
    #[schemars(with = "String")]
    pub jwt_token_secret: String,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_authority_host() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_website_hostname() -> String {
    "localhost:3000".to_string()
}

fn default_scheme() -> String {
    "http://".to_string()
}

fn default_port() -> u16 {
    3000
}

impl ConfigV1 {
    /// The URI the identity provider sends the browser back to.
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.scheme, self.website_hostname)
    }

    /// The tenant-specific authority, e.g. `https://login.microsoftonline.com/<tenant>`.
    pub fn authority(&self) -> String {
        format!(
            "{}/{}",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }

    /// Rejects required values that were supplied but left empty.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("tenant_id", &self.tenant_id),
            ("authority_host", &self.authority_host),
            ("website_hostname", &self.website_hostname),
            ("scheme", &self.scheme),
            ("jwt_token_secret", &self.jwt_token_secret),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(format!("Missing configuration values: {}", missing.join(", ")));
        }
        if self.port == 0 {
            return Err("Invalid port: 0".to_string());
        }
        if matches!(self.session.ttl_in_s, Some(ttl) if ttl <= 0) {
            return Err("session.ttl_in_s must be positive".to_string());
        }
        Ok(())
    }
}

/// Credentials and hostnames straight from the environment, without figment's
/// value parsing, so `0123` or `true` stay the text that was set.
fn string_env() -> Serialized<Dict> {
    let dict: Dict = Env::raw()
        .only(&STRING_ENV)
        .iter()
        .map(|(key, value)| (key.as_str().to_ascii_lowercase(), Value::from(value)))
        .collect();
    Serialized::defaults(dict)
}

/// The figment used at startup: `./config.yaml` if present, overridden by the environment.
pub fn figment() -> Figment {
    Figment::new()
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::raw().only(&["PORT"]))
        .merge(string_env())
        .merge(
            Env::prefixed("SESSION_")
                .map(|key| format!("session.{}", key.as_str().to_ascii_lowercase()).into()),
        )
        .merge(
            Env::prefixed("LOGGING_")
                .map(|key| format!("logging.{}", key.as_str().to_ascii_lowercase()).into()),
        )
}

/// Extracts and validates a config from any figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, String> {
    let config = figment
        .extract::<ConfigV1>()
        .map_err(|e| e.to_string())?;
    config.validate()?;
    Ok(config)
}

/// Load the config, exiting the process if anything required is missing.
pub fn load_config() -> ConfigV1 {
    match extract_config(&figment()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<(), serde_json::Error> {
    let schema = schema_for!(ConfigV1);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
