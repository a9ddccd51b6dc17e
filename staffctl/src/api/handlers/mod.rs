//! Axum route handlers.
//!
//! Handlers validate input with [`crate::validation`], then call a repository from
//! [`crate::db::handlers`] on a pooled connection bounded by the configured query timeout.
//! Errors convert into [`crate::errors::Error`], which maps them to status codes.

pub mod clearances;
pub mod healthcheck;
pub mod positions;
pub mod resource_requests;
pub mod resources;
