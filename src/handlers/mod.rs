// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token required)
pub mod protected; // Categories and products, behind the authorization gate
pub mod public;    // Service info, health and login
