use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app::domain::preferences::{
    FontSpec, HtmlStylingMode, PreferenceKey, PreferenceValue, Preferences,
};
use crate::app::infrastructure::error::Result;

/// Largest window dimension, in characters, the size fields accept.
pub const MAX_DIMENSION_IN_CHARS: u32 = 10_000;

/// Which font the font panel is currently editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTarget {
    RichText,
    PlainText,
}

/// Owns the shared preferences value and its backing file.
pub struct PreferencesController {
    prefs: Rc<RefCell<Preferences>>,
    path: PathBuf,
    font_target: FontTarget,
    original_dimension: Option<(PreferenceKey, u32)>,
}

impl PreferencesController {
    /// Load from the default location.
    pub fn load() -> Self {
        Self::load_from(&Preferences::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        Self {
            prefs: Rc::new(RefCell::new(Preferences::load_from(path))),
            path: path.to_path_buf(),
            font_target: FontTarget::RichText,
            original_dimension: None,
        }
    }

    /// Handle to the live preferences for other controllers.
    pub fn shared(&self) -> Rc<RefCell<Preferences>> {
        Rc::clone(&self.prefs)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        self.prefs.borrow().save_to(&self.path)
    }

    pub fn get(&self, key: PreferenceKey) -> PreferenceValue {
        self.prefs.borrow().value(key)
    }

    pub fn set(&self, key: PreferenceKey, value: PreferenceValue) -> Result<()> {
        self.prefs.borrow_mut().set_value(key, value)
    }

    /// Restore every key to its default and persist the result.
    pub fn revert_to_defaults(&mut self) -> Result<()> {
        *self.prefs.borrow_mut() = Preferences::default();
        self.original_dimension = None;
        log::info!("Preferences reverted to defaults");
        self.save()
    }

    // Fonts

    pub fn rich_text_font(&self) -> FontSpec {
        self.prefs.borrow().rich_text_font.clone()
    }

    pub fn set_rich_text_font(&self, font: FontSpec) {
        self.prefs.borrow_mut().rich_text_font = font;
    }

    pub fn plain_text_font(&self) -> FontSpec {
        self.prefs.borrow().plain_text_font.clone()
    }

    pub fn set_plain_text_font(&self, font: FontSpec) {
        self.prefs.borrow_mut().plain_text_font = font;
    }

    /// Start editing the rich text font; returns the font to show in the panel.
    pub fn change_rich_text_font(&mut self) -> FontSpec {
        self.font_target = FontTarget::RichText;
        self.rich_text_font()
    }

    pub fn change_plain_text_font(&mut self) -> FontSpec {
        self.font_target = FontTarget::PlainText;
        self.plain_text_font()
    }

    pub fn font_target(&self) -> FontTarget {
        self.font_target
    }

    /// Font panel response: `convert` maps the current font to the new one,
    /// which is stored on whichever font is being edited.
    pub fn change_font(&self, convert: impl FnOnce(&FontSpec) -> FontSpec) {
        match self.font_target {
            FontTarget::RichText => {
                let font = convert(&self.rich_text_font());
                self.set_rich_text_font(font);
            }
            FontTarget::PlainText => {
                let font = convert(&self.plain_text_font());
                self.set_plain_text_font(font);
            }
        }
    }

    // Window size fields

    /// Remember the value a size field had when editing began.
    pub fn begin_dimension_edit(&mut self, key: PreferenceKey) {
        if let PreferenceValue::Int(value) = self.get(key) {
            self.original_dimension = Some((key, value));
        }
    }

    /// Commit a size field. Invalid input restores the value from before the
    /// edit and returns false.
    pub fn commit_dimension_field(&mut self, key: PreferenceKey, input: &str) -> bool {
        if !matches!(key, PreferenceKey::WindowWidth | PreferenceKey::WindowHeight) {
            return false;
        }
        let previous = match self.original_dimension.take() {
            Some((edited, value)) if edited == key => value,
            _ => match self.get(key) {
                PreferenceValue::Int(value) => value,
                _ => return false,
            },
        };

        let parsed = input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|v| (1..=MAX_DIMENSION_IN_CHARS).contains(v));
        let (value, valid) = match parsed {
            Some(v) => (v, true),
            None => {
                log::debug!("Rejected {} value {:?}", key.name(), input);
                (previous, false)
            }
        };
        let mut prefs = self.prefs.borrow_mut();
        if key == PreferenceKey::WindowWidth {
            prefs.window_width = value;
        } else {
            prefs.window_height = value;
        }
        valid
    }

    // HTML pop-ups

    pub fn html_document_type_tag(&self) -> i64 {
        i64::from(self.prefs.borrow().html_document_type_options())
    }

    /// Returns false for tags outside the doctype pop-up.
    pub fn set_html_document_type_tag(&self, tag: i64) -> bool {
        match u8::try_from(tag) {
            Ok(options) if options <= 3 => {
                self.prefs.borrow_mut().set_html_document_type_options(options);
                true
            }
            _ => false,
        }
    }

    pub fn html_styling_tag(&self) -> i64 {
        self.prefs.borrow().html_styling_mode() as i64
    }

    pub fn set_html_styling_tag(&self, tag: i64) -> bool {
        match HtmlStylingMode::from_tag(tag) {
            Some(mode) => {
                self.prefs.borrow_mut().set_html_styling_mode(mode);
                true
            }
            None => false,
        }
    }
}
