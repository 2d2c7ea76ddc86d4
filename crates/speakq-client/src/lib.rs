#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// Allow private types in public type alias - DefaultSynthesisClient is meant to
// be used through the SynthesisBackend port, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod endpoint;
mod error;
mod http;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::{DefaultSynthesisClient, SynthesisClient};

// Configuration
pub use config::{DEFAULT_INFER_PATH, SynthesisClientConfig};

// Errors
pub use error::{ClientError, ClientResult};

// Silence unused dev-dependency warnings (axum is used by tests/ only)
#[cfg(test)]
use axum as _;
