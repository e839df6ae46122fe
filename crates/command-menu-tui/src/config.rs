use command_menu::MenuOptions;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = "command-menu.toml";

/// Application configuration loaded from command-menu.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub menu: MenuOptions,
    #[serde(default = "default_items", rename = "item")]
    pub items: Vec<ItemConfig>,
}

/// One `[[item]]` table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItemConfig {
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub shortcut: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    /// Shown in the status line when the item runs
    #[serde(default)]
    pub message: Option<String>,
}

impl ItemConfig {
    fn sample(id: &str, value: &str, group: &str) -> Self {
        Self {
            id: id.to_string(),
            value: value.to_string(),
            keywords: Vec::new(),
            description: String::new(),
            group: Some(group.to_string()),
            shortcut: None,
            disabled: false,
            message: None,
        }
    }
}

fn default_items() -> Vec<ItemConfig> {
    vec![
        ItemConfig {
            description: "Open a file from disk".to_string(),
            shortcut: Some("Ctrl+O".to_string()),
            ..ItemConfig::sample("file.open", "Open File", "File")
        },
        ItemConfig {
            description: "Write the current buffer".to_string(),
            shortcut: Some("Ctrl+S".to_string()),
            keywords: vec!["write".to_string(), "persist".to_string()],
            ..ItemConfig::sample("file.save", "Save File", "File")
        },
        ItemConfig::sample("file.recent", "Open Recent", "File"),
        ItemConfig {
            keywords: vec!["color".to_string(), "appearance".to_string()],
            ..ItemConfig::sample("view.theme", "Change Theme", "View")
        },
        ItemConfig::sample("view.terminal", "Toggle Terminal", "View"),
        ItemConfig {
            description: "Needs a collaborator session".to_string(),
            disabled: true,
            ..ItemConfig::sample("view.share", "Share Screen", "View")
        },
        ItemConfig::sample("fruit.apple", "Apple", "Fruit"),
        ItemConfig::sample("fruit.banana", "Banana", "Fruit"),
        ItemConfig::sample("fruit.grape", "Grape", "Fruit"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            menu: MenuOptions::default(),
            items: default_items(),
        }
    }
}

impl Config {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        // Try current directory first
        if let Some(config) = Self::load_file(Path::new(CONFIG_FILE)) {
            return config;
        }

        // Try home directory
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home).join(format!(".{}", CONFIG_FILE));
            if let Some(config) = Self::load_file(&home_config) {
                return config;
            }
        }

        log::debug!("Using default config");
        Self::default()
    }

    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match Self::parse(&content) {
            Ok(config) => {
                log::debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring {}: {}", path.display(), err);
                None
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.menu.should_filter);
    }

    #[test]
    fn test_parse_items_and_options() {
        let config = Config::parse(
            r#"
            [menu]
            loop_navigation = true

            [[item]]
            id = "deploy"
            value = "Deploy to staging"
            keywords = ["ship"]
            group = "Ops"
            message = "Deploying..."

            [[item]]
            id = "rollback"
            value = "Roll back"
            disabled = true
            "#,
        )
        .unwrap();

        assert!(config.menu.loop_navigation);
        assert!(config.menu.vim_bindings);
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0].group.as_deref(), Some("Ops"));
        assert_eq!(config.items[0].keywords, vec!["ship"]);
        assert!(config.items[1].disabled);
        assert_eq!(config.items[1].group, None);
    }

    #[test]
    fn test_item_requires_value() {
        assert!(Config::parse("[[item]]\nid = \"x\"\n").is_err());
    }
}
