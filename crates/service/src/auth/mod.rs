//! Auth module: domain types, the user directory abstraction, and the
//! credential & code service built on top of them.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use errors::AuthError;
pub use service::{AuthConfig, AuthService};
