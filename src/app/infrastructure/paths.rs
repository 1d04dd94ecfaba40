use std::path::PathBuf;

const APP_DIR: &str = "quilledit";

/// Preferences file path (cross-platform): config_dir/quilledit/preferences.json
pub fn preferences_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("preferences.json");
    path
}

/// Plugin directory: data_dir/quilledit/plugins/
pub fn plugins_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path.push("plugins");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_path_shape() {
        let path = preferences_path();
        assert!(path.ends_with("quilledit/preferences.json"));
    }

    #[test]
    fn test_plugins_dir_shape() {
        assert!(plugins_dir().ends_with("quilledit/plugins"));
    }
}
