//! service-core: Shared infrastructure for the box generation service.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
