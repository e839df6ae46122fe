/// What an activated menu item does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ClearSearch,
    ToggleDebugConsole,
    /// Show a message in the status line
    Notify(String),
}
