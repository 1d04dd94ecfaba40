//! Services layer - document operations and utilities.
//!
//! - Format codecs (plain text, RTF, HTML)
//! - Plugin manifests
//! - Text helpers

pub mod codec;
pub mod plugin_manifest;
pub mod text_ops;
