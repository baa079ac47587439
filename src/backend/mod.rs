//! Hosted backend access — auth sessions and the table-query API.

pub mod auth;
pub mod client;

pub use auth::{AuthClient, AuthUser, Session};
pub use client::BackendClient;
