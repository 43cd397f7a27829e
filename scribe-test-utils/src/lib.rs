//! Test utilities shared across the scribe workspace
//!
//! This crate provides common testing infrastructure including:
//! - XDG directory and environment isolation ([`EnvTestGuard`])
//! - A throwaway RSA key pair for app assertion tests ([`keys`])
//! - Canned GitHub API responses for wiremock servers ([`github`])
//!
//! The dead_code lint is disabled for this crate because test utilities may
//! not be used by all tests, and the compiler cannot detect usage across crate
//! boundaries in development dependencies.

#![allow(dead_code)]

pub mod env;
pub mod github;
pub mod keys;

// Re-export commonly used items
pub use env::EnvTestGuard;
pub use keys::{MALFORMED_RSA_PRIVATE_KEY, TEST_RSA_PRIVATE_KEY, TEST_RSA_PUBLIC_KEY};
