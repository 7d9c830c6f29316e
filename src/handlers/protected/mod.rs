// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind jwt_auth_middleware, which places the decoded
// Claims in the request extensions. Each handler then checks the privilege
// its operation needs through AccessPolicy before touching a service.
pub mod employees;
pub mod users;
