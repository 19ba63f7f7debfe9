//! Test utilities shared across the atlas workspace
//!
//! This crate provides common testing infrastructure including:
//! - Serialised environment variable overrides ([`EnvVarGuard`])
//! - Temporary home directories holding a `.netrc` ([`NetrcGuard`])
//!
//! The dead_code lint is disabled for this crate because test utilities may
//! not be used by all tests, and the compiler cannot detect usage across crate
//! boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod netrc;

// Re-export commonly used items
pub use env::EnvVarGuard;
pub use netrc::NetrcGuard;
