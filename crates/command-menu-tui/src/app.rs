use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Context, Result};
use command_menu::{
    CommandContext, CommandItem, CommandMenu, KeyOutcome, Providers, Registration, Section,
    Subscription,
};
use ratatui::crossterm::event::{Event, KeyEventKind};

use crate::actions::Action;
use crate::config::Config;
use crate::keys::{Input, map_key};
use crate::log_capture::LogBuffer;
use crate::providers::{BuiltinProvider, ConfigProvider, ProviderState};
use crate::theme::Theme;

#[derive(Debug)]
pub struct DebugConsoleState {
    pub open: bool,
    pub logs: LogBuffer,
    pub height_percent: u16,
}

/// Everything the render layer reads, refreshed after every flush
#[derive(Debug, Default)]
pub struct MenuView {
    pub search: String,
    pub sections: Vec<Section>,
    pub selected: Option<String>,
    pub label: Option<String>,
}

pub struct App {
    menu: CommandMenu,
    ctx: CommandContext,
    providers: Providers<Action, ProviderState>,
    items: HashMap<String, CommandItem<Action>>,
    registrations: Vec<Registration>,
    dirty: Rc<Cell<bool>>,
    _subscription: Subscription,
    view: MenuView,
    pub theme: Theme,
    pub debug_console: DebugConsoleState,
    pub status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, logs: LogBuffer) -> Result<Self> {
        let label = config.menu.label.clone();
        let menu = CommandMenu::new(config.menu);
        let ctx = menu.context();

        // Every emit means the store changed; redraw on the next loop turn
        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        let subscription = menu.store().subscribe(move || flag.set(true));

        let mut providers = Providers::new();
        providers.register(Box::new(ConfigProvider::new(config.items)));
        providers.register(Box::new(BuiltinProvider));

        let mut app = Self {
            menu,
            ctx,
            providers,
            items: HashMap::new(),
            registrations: Vec::new(),
            dirty,
            _subscription: subscription,
            view: MenuView {
                label,
                ..MenuView::default()
            },
            theme: Theme::default(),
            debug_console: DebugConsoleState {
                open: false,
                logs,
                height_percent: 40,
            },
            status: None,
            should_quit: false,
        };
        app.mount_providers()?;
        Ok(app)
    }

    fn provider_state(&self) -> ProviderState {
        ProviderState {
            debug_console_open: self.debug_console.open,
        }
    }

    /// Replace every mounted item with what the providers offer now
    fn mount_providers(&mut self) -> Result<()> {
        for registration in self.registrations.drain(..) {
            registration.unregister();
        }

        let commands = self.providers.all_commands(&self.provider_state());
        self.registrations = self
            .ctx
            .mount_items(&commands)
            .context("Failed to mount provider items")?;
        log::debug!(
            "mounted {} item(s) from {} provider(s)",
            commands.len(),
            self.providers.provider_count()
        );
        self.items = commands
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        self.flush()
    }

    /// End of tick: run the batched work and snapshot what the view needs
    fn flush(&mut self) -> Result<()> {
        let ran = self.menu.flush();
        if ran > 0 {
            log::trace!("flushed {} task(s)", ran);
        }
        let state = self.ctx.snapshot()?;
        self.view.sections = self.ctx.sections()?;
        self.view.search = state.search;
        self.view.selected = state.selected;
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_input(map_key(&key)),
            Event::Resize(..) => {
                self.dirty.set(true);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn handle_input(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Menu(key) => {
                if let KeyOutcome::Activated(id) = self.ctx.handle_key(key)? {
                    self.activate(&id)?;
                }
            }
            Input::Type(c) => {
                let mut search = self.view.search.clone();
                search.push(c);
                self.ctx.set_search(&search)?;
            }
            Input::Backspace => {
                let mut search = self.view.search.clone();
                search.pop();
                self.ctx.set_search(&search)?;
            }
            Input::Escape if self.view.search.is_empty() => self.dispatch(Action::Quit)?,
            Input::Escape => self.dispatch(Action::ClearSearch)?,
            Input::ToggleDebugConsole => self.dispatch(Action::ToggleDebugConsole)?,
            Input::Quit => self.dispatch(Action::Quit)?,
            Input::None => {}
        }
        self.flush()
    }

    fn activate(&mut self, id: &str) -> Result<()> {
        let Some(action) = self.items.get(id).map(|item| item.action.clone()) else {
            log::warn!("activated unknown item {}", id);
            return Ok(());
        };
        log::debug!("activated {} -> {:?}", id, action);
        self.dispatch(action)
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ClearSearch => self.ctx.set_search("")?,
            Action::ToggleDebugConsole => {
                self.debug_console.open = !self.debug_console.open;
                self.dirty.set(true);
                self.mount_providers()?;
            }
            Action::Notify(message) => {
                log::info!("{}", message);
                self.status = Some(message);
                self.dirty.set(true);
            }
        }
        Ok(())
    }

    pub fn view(&self) -> &MenuView {
        &self.view
    }

    pub fn items(&self) -> &HashMap<String, CommandItem<Action>> {
        &self.items
    }

    /// Whether anything changed since the last call
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_capture::create_buffer;
    use command_menu::MenuKey;

    fn app() -> App {
        App::new(Config::default(), create_buffer()).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_input(Input::Type(c)).unwrap();
        }
    }

    #[test]
    fn test_mounts_config_and_builtin_items() {
        let app = app();
        assert!(app.items().contains_key("file.save"));
        assert!(app.items().contains_key("app.quit"));
        assert_eq!(app.view().selected.as_deref(), Some("file.open"));
        assert!(app.take_dirty());
        assert!(!app.take_dirty());
    }

    #[test]
    fn test_typing_filters_and_enter_dispatches() {
        let mut app = app();
        type_text(&mut app, "save");
        assert_eq!(app.view().search, "save");
        assert_eq!(app.view().selected.as_deref(), Some("file.save"));

        app.handle_input(Input::Menu(MenuKey::Enter)).unwrap();
        assert_eq!(app.status.as_deref(), Some("Ran \"Save File\""));
    }

    #[test]
    fn test_escape_clears_then_quits() {
        let mut app = app();
        type_text(&mut app, "qu");

        app.handle_input(Input::Escape).unwrap();
        assert_eq!(app.view().search, "");
        assert!(!app.should_quit());

        app.handle_input(Input::Escape).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_toggle_console_remounts_label() {
        let mut app = app();
        app.handle_input(Input::ToggleDebugConsole).unwrap();

        assert!(app.debug_console.open);
        assert_eq!(
            app.items().get("app.debug-console").map(|i| i.value.as_str()),
            Some("Hide Debug Console")
        );
        assert_eq!(app.view().selected.as_deref(), Some("file.open"));
    }

    #[test]
    fn test_disabled_item_is_skipped() {
        let mut app = app();
        type_text(&mut app, "share");

        assert!(app.view().sections.iter().any(|s| s.items.iter().any(|i| i == "view.share")));
        app.handle_input(Input::Menu(MenuKey::Enter)).unwrap();
        assert_eq!(app.status, None);
    }
}
