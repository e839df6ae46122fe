use std::collections::HashMap;

use command_menu::{CommandItem, Section};
use ratatui::style::Color;

use crate::actions::Action;
use crate::theme::Theme;

/// View model for the command menu - all presentation data pre-computed
#[derive(Debug, Clone)]
pub struct CommandMenuViewModel {
    /// Search text with prompt
    pub input_text: String,
    /// Number of visible items (headings excluded)
    pub total_items: usize,
    /// Rows inside the scroll window
    pub visible_rows: Vec<MenuRow>,
    /// Description of the highlighted item, if it has one
    pub selected_description: Option<String>,
    pub scroll_offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuRow {
    Heading(String),
    Item(ItemRow),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub id: String,
    pub is_selected: bool,
    /// "> " or "  "
    pub indicator: String,
    /// Shortcut hint padded to 10 columns
    pub shortcut_hint: String,
    pub title: String,
    pub disabled: bool,
    pub fg_color: Color,
    pub bg_color: Color,
}

impl CommandMenuViewModel {
    /// Build view model from the menu's rendered sections
    pub fn from_state(
        search: &str,
        sections: &[Section],
        selected: Option<&str>,
        items: &HashMap<String, CommandItem<Action>>,
        visible_height: usize,
        theme: &Theme,
    ) -> Self {
        let mut rows = Vec::new();
        for section in sections {
            if let Some(group) = &section.group {
                rows.push(MenuRow::Heading(group.clone()));
            }
            for id in &section.items {
                rows.push(MenuRow::Item(item_row(id, selected, items, theme)));
            }
        }

        let total_items = sections.iter().map(|s| s.items.len()).sum();
        let selected_index = rows
            .iter()
            .position(|row| matches!(row, MenuRow::Item(item) if item.is_selected))
            .unwrap_or(0);

        // Keep the highlighted row roughly centered
        let total_rows = rows.len();
        let scroll_offset = if total_rows <= visible_height || selected_index < visible_height / 2 {
            0
        } else if selected_index >= total_rows.saturating_sub(visible_height / 2) {
            total_rows.saturating_sub(visible_height)
        } else {
            selected_index.saturating_sub(visible_height / 2)
        };

        let visible_rows = rows
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let selected_description = selected
            .and_then(|id| items.get(id))
            .map(|item| item.description.clone())
            .filter(|description| !description.is_empty());

        Self {
            input_text: format!("> {}", search),
            total_items,
            visible_rows,
            selected_description,
            scroll_offset,
        }
    }
}

fn item_row(
    id: &str,
    selected: Option<&str>,
    items: &HashMap<String, CommandItem<Action>>,
    theme: &Theme,
) -> ItemRow {
    let is_selected = selected == Some(id);
    let item = items.get(id);

    let indicator = if is_selected { "> " } else { "  " }.to_string();
    let shortcut_hint = match item.and_then(|item| item.shortcut_hint.as_deref()) {
        Some(hint) => format!("{:10} ", hint),
        None => " ".repeat(11),
    };
    let title = item.map_or_else(|| id.to_string(), |item| item.value.clone());
    let disabled = item.is_some_and(|item| item.disabled);

    let (fg_color, bg_color) = if is_selected {
        (theme.selected_fg, theme.selected_bg)
    } else if disabled {
        (theme.text_muted, Color::Reset)
    } else {
        (theme.text_primary, Color::Reset)
    };

    ItemRow {
        id: id.to_string(),
        is_selected,
        indicator,
        shortcut_hint,
        title,
        disabled,
        fg_color,
        bg_color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> HashMap<String, CommandItem<Action>> {
        [
            CommandItem::new("open", "Open File", Action::ClearSearch)
                .in_group("File")
                .with_shortcut("Ctrl+O")
                .with_description("Open a file"),
            CommandItem::new("save", "Save File", Action::ClearSearch).in_group("File"),
            CommandItem::new("quit", "Quit", Action::Quit),
        ]
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect()
    }

    fn sections() -> Vec<Section> {
        vec![
            Section {
                group: None,
                items: vec!["quit".to_string()],
            },
            Section {
                group: Some("File".to_string()),
                items: vec!["open".to_string(), "save".to_string()],
            },
        ]
    }

    #[test]
    fn test_headings_and_selection() {
        let vm = CommandMenuViewModel::from_state(
            "fi",
            &sections(),
            Some("open"),
            &items(),
            10,
            &Theme::default(),
        );

        assert_eq!(vm.input_text, "> fi");
        assert_eq!(vm.total_items, 3);
        assert_eq!(vm.visible_rows.len(), 4);
        assert_eq!(vm.visible_rows[1], MenuRow::Heading("File".to_string()));

        let MenuRow::Item(open) = &vm.visible_rows[2] else {
            panic!("expected an item row");
        };
        assert!(open.is_selected);
        assert_eq!(open.indicator, "> ");
        assert_eq!(open.shortcut_hint, "Ctrl+O     ");
        assert_eq!(vm.selected_description.as_deref(), Some("Open a file"));
    }

    #[test]
    fn test_scroll_keeps_selection_visible() {
        let many: Vec<String> = (0..50).map(|i| format!("item-{i}")).collect();
        let sections = vec![Section {
            group: None,
            items: many,
        }];

        let vm = CommandMenuViewModel::from_state(
            "",
            &sections,
            Some("item-30"),
            &HashMap::new(),
            10,
            &Theme::default(),
        );

        assert_eq!(vm.scroll_offset, 25);
        assert!(vm.visible_rows.iter().any(|row| matches!(
            row,
            MenuRow::Item(item) if item.is_selected && item.title == "item-30"
        )));

        let last = CommandMenuViewModel::from_state(
            "",
            &sections,
            Some("item-49"),
            &HashMap::new(),
            10,
            &Theme::default(),
        );
        assert_eq!(last.scroll_offset, 40);
    }

    #[test]
    fn test_empty_menu() {
        let vm = CommandMenuViewModel::from_state(
            "zzz",
            &[],
            None,
            &items(),
            10,
            &Theme::default(),
        );
        assert!(vm.visible_rows.is_empty());
        assert_eq!(vm.total_items, 0);
        assert_eq!(vm.selected_description, None);
    }
}
