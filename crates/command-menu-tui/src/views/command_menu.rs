use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    prelude::*,
    widgets::*,
};

use crate::app::App;
use crate::view_models::command_menu::{CommandMenuViewModel, MenuRow};

/// Render the command menu popup
pub fn render_command_menu(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let view = app.view();

    // Centered area (70% width, 70% height)
    let popup_width = (area.width * 70 / 100).min(100);
    let popup_height = (area.height * 70 / 100).min(30);
    let popup_area = Rect {
        x: area.x + area.width.saturating_sub(popup_width) / 2,
        y: area.y + area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    f.render_widget(Clear, popup_area);

    let label = view.label.as_deref().unwrap_or("Command Menu");
    let inner = popup_area.inner(Margin {
        horizontal: 2,
        vertical: 1,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input box
            Constraint::Min(3),    // Results list
            Constraint::Length(1), // Details
            Constraint::Length(1), // Footer
        ])
        .split(inner);

    let vm = CommandMenuViewModel::from_state(
        &view.search,
        &view.sections,
        view.selected.as_deref(),
        app.items(),
        chunks[1].height as usize,
        theme,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({} items) ", label, vm.total_items))
        .title_style(theme.panel_title())
        .border_style(theme.panel_border())
        .style(Style::default().bg(theme.bg_panel));
    f.render_widget(block, popup_area);

    let input = Paragraph::new(vm.input_text.clone())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent_primary))
                .style(Style::default().bg(theme.bg_secondary)),
        )
        .style(Style::default().fg(theme.text_primary));
    f.render_widget(input, chunks[0]);

    if vm.visible_rows.is_empty() {
        let no_results = Paragraph::new("No results found.")
            .style(theme.muted())
            .alignment(Alignment::Center);
        f.render_widget(no_results, chunks[1]);
    } else {
        let lines: Vec<Line> = vm
            .visible_rows
            .iter()
            .map(|row| match row {
                MenuRow::Heading(group) => {
                    Line::from(Span::styled(group.clone(), theme.section_header()))
                }
                MenuRow::Item(item) => {
                    let mut title_style = Style::default().fg(item.fg_color).bg(item.bg_color);
                    if item.is_selected {
                        title_style = title_style.add_modifier(Modifier::BOLD);
                    }
                    if item.disabled {
                        title_style = title_style.add_modifier(Modifier::DIM);
                    }
                    Line::from(vec![
                        Span::styled(item.indicator.clone(), theme.key_hint()),
                        Span::styled(item.shortcut_hint.clone(), theme.muted()),
                        Span::styled(item.title.clone(), title_style),
                    ])
                }
            })
            .collect();

        f.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme.bg_panel)),
            chunks[1],
        );
    }

    if let Some(description) = &vm.selected_description {
        f.render_widget(
            Paragraph::new(description.clone()).style(Style::default().fg(theme.text_secondary)),
            chunks[2],
        );
    }

    let footer = Line::from(vec![
        Span::styled("Enter", theme.key_hint()),
        Span::styled(" run  ", theme.muted()),
        Span::styled("↑/↓", theme.key_hint()),
        Span::styled(" navigate  ", theme.muted()),
        Span::styled("Alt+↑/↓", theme.key_hint()),
        Span::styled(" group  ", theme.muted()),
        Span::styled("Esc", theme.key_hint()),
        Span::styled(" clear/quit", theme.muted()),
    ]);
    f.render_widget(
        Paragraph::new(footer).alignment(Alignment::Center),
        chunks[3],
    );
}
