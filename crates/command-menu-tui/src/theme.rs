use ratatui::{prelude::*, style::palette::tailwind};

/// Colors and prebuilt styles for the menu and the debug console
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_panel: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Status colors
    pub status_error: Color,
    pub status_warning: Color,

    // Selection colors
    pub selected_bg: Color,
    pub selected_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Sky and amber on zinc
    pub fn dark() -> Self {
        Self {
            bg_primary: tailwind::ZINC.c950,
            bg_secondary: tailwind::ZINC.c900,
            bg_panel: tailwind::ZINC.c800,

            text_primary: tailwind::SKY.c50,
            text_secondary: tailwind::SKY.c200,
            text_muted: tailwind::ZINC.c500,

            accent_primary: tailwind::SKY.c400,
            accent_secondary: tailwind::AMBER.c400,

            status_error: tailwind::ROSE.c400,
            status_warning: tailwind::AMBER.c300,

            selected_bg: tailwind::SKY.c700,
            selected_fg: tailwind::SKY.c50,
        }
    }

    pub fn panel_border(&self) -> Style {
        Style::default().fg(self.accent_primary)
    }

    pub fn panel_title(&self) -> Style {
        self.panel_border().add_modifier(Modifier::BOLD)
    }

    /// Group headings in the item list
    pub fn section_header(&self) -> Style {
        Style::default()
            .fg(self.accent_secondary)
            .add_modifier(Modifier::BOLD)
    }

    /// Keys named in the footer, e.g. "Enter"
    pub fn key_hint(&self) -> Style {
        self.panel_title()
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Foreground for a captured log record
    pub fn log_level(&self, level: log::Level) -> Color {
        match level {
            log::Level::Error => self.status_error,
            log::Level::Warn => self.status_warning,
            log::Level::Info => self.text_primary,
            log::Level::Debug => self.text_secondary,
            log::Level::Trace => self.text_muted,
        }
    }
}
