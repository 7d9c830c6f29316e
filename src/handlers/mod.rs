// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (bearer token + privilege check)
pub mod protected; // /api/v1/*, behind jwt_auth_middleware
pub mod public; // /, /health, /token
