//! Shared HTTP plumbing for the Foodgram service.

pub mod health;
pub mod middleware;
pub mod tracing;
