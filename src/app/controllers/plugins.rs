use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::app::domain::menu::{Menu, MenuAction, MenuInvocation, MenuItem, ModifierMask, UserObject};
use crate::app::services::plugin_manifest::{manifest_paths, PluginManifest};

pub const PLUGINS_MENU_TITLE: &str = "Plugins";

/// What a plugin sees of the application.
pub trait PluginHost {
    /// Add an item to the Plugins menu. Returns false when the menu is not
    /// available, the title is empty, the key equivalent is more than one
    /// character, or an item with that title already exists.
    fn register_menu_entry(
        &mut self,
        title: &str,
        action: MenuAction,
        key_equivalent: &str,
        modifiers: ModifierMask,
        user_object: Option<UserObject>,
    ) -> bool;
}

pub trait Plugin {
    fn name(&self) -> &str;

    /// Called once after loading; register menu entries here.
    fn did_load(&self, host: &mut dyn PluginHost);
}

/// A manifest command chosen from the Plugins menu, waiting to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginCommand {
    pub plugin: String,
    pub command: String,
}

pub struct PluginManager {
    menu: Option<Menu>,
    loaded: Vec<String>,
    pending: Rc<RefCell<Vec<PluginCommand>>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            menu: Some(Menu::new(PLUGINS_MENU_TITLE)),
            loaded: Vec::new(),
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A manager whose menu bar has no Plugins menu yet.
    pub fn without_menu() -> Self {
        Self {
            menu: None,
            ..Self::new()
        }
    }

    pub fn install_menu(&mut self) {
        if self.menu.is_none() {
            self.menu = Some(Menu::new(PLUGINS_MENU_TITLE));
        }
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn loaded_plugins(&self) -> &[String] {
        &self.loaded
    }

    pub fn load_plugin(&mut self, plugin: &dyn Plugin) {
        plugin.did_load(self);
        log::info!("Loaded plugin {}", plugin.name());
        self.loaded.push(plugin.name().to_string());
    }

    /// Register the entries of `manifest`. Returns how many were added.
    pub fn load_manifest(&mut self, manifest: &PluginManifest) -> usize {
        let mut added = 0;
        for entry in &manifest.entries {
            let modifiers = match entry.modifier_mask() {
                Ok(mask) => mask,
                Err(e) => {
                    log::warn!("Skipping entry of plugin {}: {}", manifest.name, e);
                    continue;
                }
            };
            let command: UserObject = Rc::new(PluginCommand {
                plugin: manifest.name.clone(),
                command: entry.command.clone(),
            });
            let queue = Rc::clone(&self.pending);
            let action: MenuAction = Rc::new(move |invocation: &MenuInvocation<'_>| {
                if let Some(command) = invocation
                    .user_object
                    .and_then(|obj| obj.downcast_ref::<PluginCommand>())
                {
                    queue.borrow_mut().push(command.clone());
                }
            });
            if self.register_menu_entry(&entry.title, action, &entry.key, modifiers, Some(command)) {
                added += 1;
            } else {
                log::warn!("Plugin {} could not add menu entry {:?}", manifest.name, entry.title);
            }
        }
        self.loaded.push(manifest.name.clone());
        added
    }

    /// Load every `*.toml` manifest in `dir`. Broken manifests are logged and
    /// skipped. Returns how many plugins loaded.
    pub fn load_plugins(&mut self, dir: &Path) -> usize {
        let paths = match manifest_paths(dir) {
            Ok(paths) => paths,
            Err(e) => {
                log::debug!("No plugins loaded from {}: {}", dir.display(), e);
                return 0;
            }
        };
        let mut count = 0;
        for path in paths {
            match PluginManifest::load(&path) {
                Ok(manifest) => {
                    let added = self.load_manifest(&manifest);
                    log::info!("Loaded plugin {} ({} menu entries)", manifest.name, added);
                    count += 1;
                }
                Err(e) => log::warn!("Failed to load plugin manifest {}: {}", path.display(), e),
            }
        }
        count
    }

    /// Run the action of the item titled `title`. False if there is none.
    pub fn invoke(&self, title: &str) -> bool {
        let Some(item) = self.menu.as_ref().and_then(|m| m.item(title)) else {
            return false;
        };
        (item.action)(&MenuInvocation {
            title: &item.title,
            user_object: item.user_object.as_deref(),
        });
        true
    }

    pub fn take_pending_commands(&self) -> Vec<PluginCommand> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginHost for PluginManager {
    fn register_menu_entry(
        &mut self,
        title: &str,
        action: MenuAction,
        key_equivalent: &str,
        modifiers: ModifierMask,
        user_object: Option<UserObject>,
    ) -> bool {
        let Some(menu) = self.menu.as_mut() else {
            return false;
        };
        if title.trim().is_empty() || key_equivalent.chars().count() > 1 {
            return false;
        }
        menu.add_item(MenuItem {
            title: title.to_string(),
            key_equivalent: key_equivalent.to_string(),
            modifiers,
            action,
            user_object,
        })
    }
}
