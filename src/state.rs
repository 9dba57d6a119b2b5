use std::sync::Arc;

use crate::auth::{CredentialVerifier, StaticCredentialVerifier, TokenService};
use crate::config::AppConfig;
use crate::database::CatalogStore;

/// Shared request state. Everything inside is immutable after startup or
/// synchronizes internally, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn CatalogStore>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth));
        let credentials = Arc::new(StaticCredentialVerifier::from_config(&config.security));

        Self {
            config: Arc::new(config),
            tokens,
            credentials,
            store,
        }
    }

    /// Replace the credential check, e.g. with an identity-store backed one.
    pub fn with_credentials(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = verifier;
        self
    }
}
