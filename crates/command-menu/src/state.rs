//! Filtered state published by the command menu store

use std::collections::{HashMap, HashSet};

/// Root state of a command menu
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Current query. Empty means "no filter, everything visible".
    pub search: String,
    /// Id of the highlighted item
    pub selected: Option<String>,
    pub filtered: Filtered,
}

/// Result of the last filter + sort pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filtered {
    /// Number of visible items
    pub count: usize,
    /// Score per mounted item. Presence does not imply visibility.
    pub items: HashMap<String, f64>,
    /// Groups with at least one visible member
    pub groups: HashSet<String>,
    /// Visible item ids in render order
    pub order: Vec<String>,
}

impl State {
    pub fn is_visible(&self, id: &str) -> bool {
        self.filtered.order.iter().any(|visible| visible == id)
    }

    pub fn is_group_visible(&self, id: &str) -> bool {
        self.filtered.groups.contains(id)
    }

    pub fn score(&self, id: &str) -> Option<f64> {
        self.filtered.items.get(id).copied()
    }

    /// Position of the highlighted item in render order
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.filtered.order.iter().position(|id| id == selected)
    }
}

/// A single shallow field update, see [`crate::Store::set_state`]
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Search(String),
    Selected(Option<String>),
    Filtered(Filtered),
}

impl Field {
    pub(crate) fn apply(self, state: &mut State) {
        match self {
            Field::Search(search) => state.search = search,
            Field::Selected(selected) => state.selected = selected,
            Field::Filtered(filtered) => state.filtered = filtered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_index() {
        let mut state = State::default();
        assert_eq!(state.selected_index(), None);

        state.filtered.order = vec!["a".into(), "b".into()];
        state.selected = Some("b".into());
        assert_eq!(state.selected_index(), Some(1));
        assert!(state.is_visible("a"));
        assert!(!state.is_visible("c"));

        state.selected = Some("c".into());
        assert_eq!(state.selected_index(), None);
    }

    #[test]
    fn test_field_apply_is_shallow() {
        let mut state = State {
            search: "old".into(),
            selected: Some("a".into()),
            ..Default::default()
        };
        state.filtered.count = 3;

        Field::Search("new".into()).apply(&mut state);
        assert_eq!(state.search, "new");
        assert_eq!(state.selected.as_deref(), Some("a"));
        assert_eq!(state.filtered.count, 3);

        Field::Filtered(Filtered::default()).apply(&mut state);
        assert_eq!(state.filtered.count, 0);
        assert_eq!(state.search, "new");
    }
}
