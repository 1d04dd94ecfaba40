//! Controllers layer - orchestration and coordination.
//!
//! Controllers coordinate between domain models and services:
//! - Open document management
//! - Preferences editing and persistence
//! - Plugins menu and plugin loading

pub mod documents;
pub mod plugins;
pub mod preferences;
