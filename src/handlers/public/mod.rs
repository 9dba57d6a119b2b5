// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus service metadata. A bad or missing bearer token never
// blocks these routes.

pub mod health; // GET /health - store connectivity
pub mod login;  // POST /login - exchange credentials for a JWT
pub mod root;   // GET / - service banner

pub use health::health;
pub use login::login;
pub use root::root;
