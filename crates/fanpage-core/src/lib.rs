//! Service plumbing shared by Fanpage services: configuration, tracing,
//! HTTP middleware, health probes and serde helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
