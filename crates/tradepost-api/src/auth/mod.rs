// Authentication module
// Decision: Stateless signed session tokens for interactive clients,
// store-backed opaque API keys for machine clients

pub mod context;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod routes;
pub mod service;

pub use context::CurrentUser;
pub use middleware::AuthState;
pub use routes::routes;
