//! User CRUD behind the role-gated endpoints.

pub mod service;

pub use service::{CreateUserInput, UpdateUserInput, UsersService};
