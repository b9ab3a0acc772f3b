// Business-logic services

pub mod user;

pub use user::{to_user, UserService};
