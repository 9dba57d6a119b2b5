use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::config::SecurityConfig;

/// Login request body.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(alias = "userName", alias = "UserName")]
    pub username: String,
    #[serde(alias = "Password")]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Decides whether a username/password pair may log in.
///
/// The token issuer never sees how this is answered, so an identity store can be
/// plugged in without touching token code.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> bool;
}

/// Accepts exactly one configured username/password pair.
pub struct StaticCredentialVerifier {
    username: [u8; 32],
    password: [u8; 32],
}

impl StaticCredentialVerifier {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: digest(username),
            password: digest(password),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(&security.admin_username, &security.admin_password)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, credentials: &Credentials) -> bool {
        // Compare fixed-size digests so timing does not depend on the plaintext.
        let user_ok = digest(&credentials.username) == self.username;
        let pass_ok = digest(&credentials.password) == self.password;
        user_ok & pass_ok
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}
