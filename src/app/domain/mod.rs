//! Domain layer - core data structures and types.
//!
//! - Document and DocumentId
//! - Document properties and formats
//! - Text encodings
//! - Menus and key equivalents
//! - Application preferences
//! - Geometry and colour values

pub mod document;
pub mod encoding;
pub mod format;
pub mod geometry;
pub mod menu;
pub mod preferences;
pub mod properties;

pub use document::{Document, DocumentId, OverwriteWarning, ReadOptions, SaveOperation, TextAttributes};
pub use encoding::TextEncoding;
pub use format::DocumentFormat;
pub use geometry::{Color, Point, Rect, Size};
pub use menu::{Menu, MenuAction, MenuInvocation, MenuItem, ModifierMask, UserObject};
pub use preferences::{FontSpec, HtmlStylingMode, PreferenceKey, PreferenceValue, Preferences};
pub use properties::DocumentProperties;
