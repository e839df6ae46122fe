use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::log_capture;

/// Captured log records, newest at the bottom
pub fn render_debug_console(f: &mut Frame, area: Rect, app: &App) {
    let console = &app.debug_console;
    let theme = &app.theme;

    let height = (area.height * console.height_percent / 100).min(area.height);
    let console_area = Rect { height, ..area };
    f.render_widget(Clear, console_area);

    let visible_height = height.saturating_sub(2) as usize;
    let (entries, total) = log_capture::tail(&console.logs, visible_height);
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let color = Style::default().fg(theme.log_level(entry.level));
            let target = if entry.target.len() > 24 {
                format!("{}...", &entry.target[..21])
            } else {
                format!("{:24}", entry.target)
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S%.3f")),
                    theme.muted(),
                ),
                Span::styled(format!("{:5} ", entry.level), color),
                Span::styled(format!("{} ", target), theme.muted()),
                Span::styled(entry.message.clone(), color),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Debug Console ({} entries) ", total))
            .title_style(theme.panel_title())
            .border_style(theme.panel_border())
            .style(Style::default().bg(theme.bg_secondary)),
    );
    f.render_widget(list, console_area);
}
