//! Business layer on top of the `models` crate, independent of the web
//! framework.
//! - `auth`: credential checks, session tokens, one-time code workflows.
//! - `email`: outbound notification gateway implementations.
//! - `users`: CRUD operations behind the role-gated endpoints.

pub mod auth;
pub mod email;
pub mod users;
