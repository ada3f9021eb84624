//! Session types shared across Fanpage services.
//!
//! Provides session JWT validation and the `Session` extractor.

pub mod identity;
pub mod token;
