//! Command provider trait and registry system

use std::fmt::Debug;

/// An item that can be mounted into a command menu
///
/// Generic over `A` (the action type) so the render layer can look up what to
/// dispatch when the item is activated.
#[derive(Debug, Clone)]
pub struct CommandItem<A> {
    /// Stable identity (e.g., "file.save")
    pub id: String,

    /// Searchable display text (e.g., "Save File")
    pub value: String,

    /// Extra search terms that are not displayed
    pub keywords: Vec<String>,

    /// Longer description shown for the highlighted item
    pub description: String,

    /// Group heading the item is rendered under (e.g., "File")
    pub group: Option<String>,

    /// Keyboard shortcut hint (e.g., "Ctrl+S")
    pub shortcut_hint: Option<String>,

    /// Visible but not selectable
    pub disabled: bool,

    /// The action to dispatch when this item is activated
    pub action: A,
}

impl<A> CommandItem<A> {
    pub fn new(id: impl Into<String>, value: impl Into<String>, action: A) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            keywords: Vec::new(),
            description: String::new(),
            group: None,
            shortcut_hint: None,
            disabled: false,
            action,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_shortcut(mut self, hint: impl Into<String>) -> Self {
        self.shortcut_hint = Some(hint.into());
        self
    }
}

/// Trait for providing items to the menu
///
/// Generic over:
/// - `A`: Action type (what gets dispatched when an item is activated)
/// - `S`: State type (used for context-aware filtering)
pub trait CommandProvider<A, S>: Debug {
    /// Get all items from this provider
    ///
    /// The provider can filter items based on the current state to ensure
    /// only relevant commands are mounted.
    fn commands(&self, state: &S) -> Vec<CommandItem<A>>;

    /// Provider name for debugging
    fn name(&self) -> &str;
}

/// Ordered set of command providers
///
/// Collects items from multiple providers and presents them as a unified list
/// ready for [`crate::CommandContext::mount_items`].
pub struct Providers<A, S> {
    providers: Vec<Box<dyn CommandProvider<A, S>>>,
}

impl<A, S> Providers<A, S> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Providers are called in the order they were registered.
    pub fn register(&mut self, provider: Box<dyn CommandProvider<A, S>>) {
        self.providers.push(provider);
    }

    /// Query every provider and concatenate their items
    pub fn all_commands(&self, state: &S) -> Vec<CommandItem<A>> {
        self.providers
            .iter()
            .flat_map(|p| {
                let commands = p.commands(state);
                log::trace!("provider {} returned {} item(s)", p.name(), commands.len());
                commands
            })
            .collect()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

impl<A, S> Default for Providers<A, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, S> Debug for Providers<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("provider_count", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Save,
        Quit,
    }

    #[derive(Debug)]
    struct TestState {
        can_save: bool,
    }

    #[derive(Debug)]
    struct TestProvider;

    impl CommandProvider<TestAction, TestState> for TestProvider {
        fn commands(&self, state: &TestState) -> Vec<CommandItem<TestAction>> {
            let mut commands =
                vec![CommandItem::new("app.quit", "Quit", TestAction::Quit).in_group("General")];

            if state.can_save {
                commands.push(
                    CommandItem::new("file.save", "Save", TestAction::Save)
                        .in_group("File")
                        .with_shortcut("Ctrl+S")
                        .with_keywords(["write", "persist"]),
                );
            }

            commands
        }

        fn name(&self) -> &str {
            "TestProvider"
        }
    }

    #[test]
    fn test_providers_basic() {
        let mut providers = Providers::new();
        assert_eq!(providers.provider_count(), 0);

        providers.register(Box::new(TestProvider));
        assert_eq!(providers.provider_count(), 1);
    }

    #[test]
    fn test_context_aware_filtering() {
        let mut providers = Providers::new();
        providers.register(Box::new(TestProvider));

        let state = TestState { can_save: false };
        let commands = providers.all_commands(&state);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].action, TestAction::Quit);

        let state = TestState { can_save: true };
        let commands = providers.all_commands(&state);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].keywords, vec!["write", "persist"]);
        assert_eq!(commands[1].group.as_deref(), Some("File"));
    }
}
