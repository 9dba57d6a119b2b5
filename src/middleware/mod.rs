pub mod auth;
pub mod response;

pub use auth::{authenticate, require_identity, Identity};
pub use response::{ApiResponse, ApiResult};
