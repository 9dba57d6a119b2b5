use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// HS256 produces a 256-bit MAC; shorter keys are rejected at startup.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("JWT_KEY must be at least {min} bytes, got {actual}")]
    WeakSigningKey { min: usize, actual: usize },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Only required by the Postgres-backed store.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    /// Empty list means any origin.
    pub cors_origins: Vec<String>,
    pub admin_username: String,
    pub admin_password: String,
}

/// Token signing parameters shared by the issuer and the validator.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub signing_key: SigningKey,
    pub issuer: String,
    pub audience: String,
    pub token_ttl: Duration,
}

/// Symmetric key material. Never printed.
#[derive(Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(ConfigError::Missing("JWT_KEY"));
        }
        if bytes.len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::WeakSigningKey {
                min: MIN_SIGNING_KEY_BYTES,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey([redacted; {} bytes])", self.0.len())
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let key = lookup("JWT_KEY").unwrap_or_default();
        let signing_key = SigningKey::new(key.into_bytes())?;

        // Set defaults based on environment, then override with specific env vars
        let preset = match environment {
            Environment::Production => Self::production(signing_key),
            Environment::Staging => Self::staging(signing_key),
            Environment::Development => Self::development(signing_key),
        };

        Ok(preset.with_overrides(&lookup))
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("CATALOG_API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("CATALOG_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("ADMIN_USERNAME") {
            self.security.admin_username = v;
        }
        if let Some(v) = lookup("ADMIN_PASSWORD") {
            self.security.admin_password = v;
        }

        // Token overrides
        if let Some(v) = lookup("JWT_ISSUER") {
            self.auth.issuer = v;
        }
        if let Some(v) = lookup("JWT_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Some(minutes) = lookup("JWT_EXPIRY_MINUTES").and_then(|v| v.parse::<u64>().ok()) {
            if minutes > 0 {
                self.auth.token_ttl = Duration::from_secs(minutes * 60);
            }
        }

        self
    }

    fn development(signing_key: SigningKey) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
                admin_username: "admin".to_string(),
                admin_password: "admin".to_string(),
            },
            auth: AuthConfig {
                signing_key,
                issuer: "catalog-api".to_string(),
                audience: "catalog-api".to_string(),
                token_ttl: Duration::from_secs(2 * 60 * 60),
            },
        }
    }

    fn staging(signing_key: SigningKey) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                admin_username: "admin".to_string(),
                admin_password: "admin".to_string(),
            },
            auth: AuthConfig {
                signing_key,
                issuer: "catalog-api".to_string(),
                audience: "catalog-api".to_string(),
                token_ttl: Duration::from_secs(2 * 60 * 60),
            },
        }
    }

    fn production(signing_key: SigningKey) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                admin_username: "admin".to_string(),
                admin_password: "admin".to_string(),
            },
            auth: AuthConfig {
                signing_key,
                issuer: "catalog-api".to_string(),
                audience: "catalog-api".to_string(),
                token_ttl: Duration::from_secs(60 * 60),
            },
        }
    }
}
