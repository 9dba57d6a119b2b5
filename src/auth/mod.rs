pub mod credentials;
pub mod token;

pub use credentials::{CredentialVerifier, Credentials, StaticCredentialVerifier};
pub use token::{Claims, IssuedToken, TokenError, TokenService};
