//! Item sources mounted into the menu

use command_menu::{CommandItem, CommandProvider};

use crate::actions::Action;
use crate::config::ItemConfig;

/// What providers may look at when deciding which items to offer
#[derive(Debug, Clone, Default)]
pub struct ProviderState {
    pub debug_console_open: bool,
}

/// Items declared in command-menu.toml
#[derive(Debug)]
pub struct ConfigProvider {
    items: Vec<ItemConfig>,
}

impl ConfigProvider {
    pub fn new(items: Vec<ItemConfig>) -> Self {
        Self { items }
    }
}

impl CommandProvider<Action, ProviderState> for ConfigProvider {
    fn commands(&self, _state: &ProviderState) -> Vec<CommandItem<Action>> {
        self.items
            .iter()
            .map(|item| {
                let message = item
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Ran \"{}\"", item.value));
                let mut command = CommandItem::new(&item.id, &item.value, Action::Notify(message))
                    .with_keywords(item.keywords.iter().cloned())
                    .with_description(&item.description);
                command.group = item.group.clone();
                command.shortcut_hint = item.shortcut.clone();
                command.disabled = item.disabled;
                command
            })
            .collect()
    }

    fn name(&self) -> &str {
        "config"
    }
}

/// Items every session has
#[derive(Debug)]
pub struct BuiltinProvider;

impl CommandProvider<Action, ProviderState> for BuiltinProvider {
    fn commands(&self, state: &ProviderState) -> Vec<CommandItem<Action>> {
        let console = if state.debug_console_open {
            "Hide Debug Console"
        } else {
            "Show Debug Console"
        };

        vec![
            CommandItem::new("app.debug-console", console, Action::ToggleDebugConsole)
                .in_group("App")
                .with_keywords(["log", "trace"])
                .with_shortcut("`"),
            CommandItem::new("app.clear", "Clear Search", Action::ClearSearch)
                .in_group("App")
                .with_shortcut("Esc"),
            CommandItem::new("app.quit", "Quit", Action::Quit)
                .in_group("App")
                .with_keywords(["exit", "close"])
                .with_shortcut("Ctrl+C"),
        ]
    }

    fn name(&self) -> &str {
        "builtin"
    }
}
