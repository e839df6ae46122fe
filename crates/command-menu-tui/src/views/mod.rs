mod command_menu;
mod debug_console;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;

/// Draw one frame
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg_primary)),
        area,
    );

    let [main, status] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    command_menu::render_command_menu(f, main, app);

    if app.debug_console.open {
        debug_console::render_debug_console(f, main, app);
    }

    let status_text = app.status.as_deref().unwrap_or("Type to search");
    f.render_widget(
        Paragraph::new(status_text).style(app.theme.muted().bg(app.theme.bg_secondary)),
        status,
    );
}
