use serde::{Deserialize, Serialize};

/// Behavior switches of a command menu
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MenuOptions {
    /// Score and hide items automatically. When false the caller renders its own filtered view.
    #[serde(default = "default_should_filter")]
    pub should_filter: bool,
    /// Wrap around when navigating past the first or last item
    #[serde(default)]
    pub loop_navigation: bool,
    /// Ignore pointer hover when highlighting items
    #[serde(default)]
    pub disable_pointer_selection: bool,
    /// Ctrl+N/J and Ctrl+P/K navigate like arrow keys
    #[serde(default = "default_vim_bindings")]
    pub vim_bindings: bool,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_should_filter() -> bool {
    true
}

fn default_vim_bindings() -> bool {
    true
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            should_filter: default_should_filter(),
            loop_navigation: false,
            disable_pointer_selection: false,
            vim_bindings: default_vim_bindings(),
            label: None,
        }
    }
}
