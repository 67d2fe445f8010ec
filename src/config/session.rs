use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for the signed session cookie.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct SessionConfig {
    /// Mark the cookie `Secure`. Only disable for plain-HTTP local development.
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
    /// Lifetime of a minted session token in seconds. `None` means the token never expires.
    #[serde(default)]
    pub ttl_in_s: Option<i64>,
}

fn default_cookie_secure() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cookie_secure: default_cookie_secure(),
            ttl_in_s: None,
        }
    }
}
