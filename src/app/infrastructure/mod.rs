//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Error types
//! - Config / data directory resolution

pub mod error;
pub mod paths;
