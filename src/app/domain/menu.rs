use std::any::Any;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

/// Keyboard modifiers for a menu key equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierMask(u32);

impl ModifierMask {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 17);
    pub const CONTROL: Self = Self(1 << 18);
    pub const OPTION: Self = Self(1 << 19);
    pub const COMMAND: Self = Self(1 << 20);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Parse a modifier name as written in plugin manifests.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "command" | "cmd" => Some(Self::COMMAND),
            "shift" => Some(Self::SHIFT),
            "option" | "alt" => Some(Self::OPTION),
            "control" | "ctrl" => Some(Self::CONTROL),
            _ => None,
        }
    }
}

impl BitOr for ModifierMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Passed to a menu action when its item is chosen.
pub struct MenuInvocation<'a> {
    pub title: &'a str,
    pub user_object: Option<&'a dyn Any>,
}

pub type MenuAction = Rc<dyn Fn(&MenuInvocation<'_>)>;
pub type UserObject = Rc<dyn Any>;

pub struct MenuItem {
    pub title: String,
    pub key_equivalent: String,
    pub modifiers: ModifierMask,
    pub action: MenuAction,
    pub user_object: Option<UserObject>,
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("title", &self.title)
            .field("key_equivalent", &self.key_equivalent)
            .field("modifiers", &self.modifiers)
            .field("has_user_object", &self.user_object.is_some())
            .finish()
    }
}

#[derive(Debug)]
pub struct Menu {
    title: String,
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            items: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, title: &str) -> Option<&MenuItem> {
        self.items.iter().find(|i| i.title == title)
    }

    /// Append `item`; titles are unique, so a duplicate is refused.
    pub fn add_item(&mut self, item: MenuItem) -> bool {
        if self.item(&item.title).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> MenuItem {
        MenuItem {
            title: title.to_string(),
            key_equivalent: String::new(),
            modifiers: ModifierMask::NONE,
            action: Rc::new(|_: &MenuInvocation<'_>| {}),
            user_object: None,
        }
    }

    #[test]
    fn test_modifier_mask() {
        let mask = ModifierMask::COMMAND | ModifierMask::SHIFT;
        assert!(mask.contains(ModifierMask::COMMAND));
        assert!(mask.contains(ModifierMask::SHIFT));
        assert!(!mask.contains(ModifierMask::OPTION));
        assert_eq!(ModifierMask::from_name("Cmd"), Some(ModifierMask::COMMAND));
        assert_eq!(ModifierMask::from_name("hyper"), None);
    }

    #[test]
    fn test_menu_rejects_duplicate_titles() {
        let mut menu = Menu::new("Plugins");
        assert!(menu.add_item(item("Count")));
        assert!(!menu.add_item(item("Count")));
        assert!(menu.add_item(item("Sort")));
        assert_eq!(menu.len(), 2);
        assert_eq!(menu.items()[1].title, "Sort");
    }
}
