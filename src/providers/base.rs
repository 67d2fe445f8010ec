use std::sync::Arc;

use super::microsoft_provider::{MicrosoftProvider, MicrosoftProviderConfig};
use crate::config::ConfigV1;
use crate::models::Identity;

/// Everything the token endpoint needs to redeem an authorization code.
#[derive(Debug, Clone, Copy)]
pub struct CodeExchange<'a> {
    pub code: &'a str,
    pub scopes: &'a [String],
    pub redirect_uri: &'a str,
}

/// An OAuth2 authorization-code identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// A descriptive name for the provider (for logs/debug).
    fn get_name(&self) -> &str;

    /// Builds the URL the browser is sent to for sign-in and consent.
    async fn authorization_url(&self, scopes: &[String], redirect_uri: &str)
        -> Result<String, String>;

    /// Redeems an authorization code and reports who signed in.
    async fn exchange_code(&self, request: CodeExchange<'_>) -> Result<Identity, String>;
}

/// Builds the identity provider described by the configuration.
pub fn create_identity_provider(config: &ConfigV1) -> Arc<dyn IdentityProvider> {
    let provider_config = MicrosoftProviderConfig {
        name: "Microsoft identity platform".to_string(),
        authority: config.authority(),
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
    };
    Arc::new(MicrosoftProvider::new(&provider_config))
}
