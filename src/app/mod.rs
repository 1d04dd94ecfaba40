//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Preferences, Menu)
//! - `controllers/` - Orchestration (documents, preferences, plugins)
//! - `services/` - Format codecs, plugin manifests, text helpers
//! - `infrastructure/` - Errors and platform paths

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::documents::DocumentController;
pub use controllers::plugins::{Plugin, PluginCommand, PluginHost, PluginManager};
pub use controllers::preferences::{FontTarget, PreferencesController};
pub use domain::{
    Document, DocumentFormat, DocumentId, DocumentProperties, PreferenceKey, PreferenceValue,
    Preferences, ReadOptions, SaveOperation, TextEncoding,
};
pub use infrastructure::error::{AppError, DocumentError, Result};
pub use services::codec::CodecRegistry;
