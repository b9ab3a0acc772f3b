// Public contracts for the Tradepost API
// This crate defines the request/response DTOs shared by the server and clients.
// Sensitive fields (password hashes, API keys) never appear in these types.

pub mod common;
pub mod user;

pub use common::*;
pub use user::*;
