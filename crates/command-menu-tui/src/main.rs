use std::time::Duration;

use anyhow::{Context, Result};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    crossterm::{self, event::Event},
};
use tokio::sync::mpsc;

mod actions;
mod app;
mod config;
mod keys;
mod log_capture;
mod providers;
mod theme;
mod view_models;
mod views;

use crate::app::App;
use crate::config::Config;

pub fn initialize_panic_handler() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = shutdown();
        original_hook(panic_info);
    }));
}

fn startup() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stderr(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(())
}

fn shutdown() -> Result<()> {
    crossterm::execute!(std::io::stderr(), crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

/// Forward terminal events until the receiver goes away
fn start_event_handler(tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    let tick_rate = Duration::from_millis(250);
    tokio::task::spawn_blocking(move || {
        loop {
            match crossterm::event::poll(tick_rate) {
                Ok(true) => match crossterm::event::read() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        log::error!("Failed to read terminal event: {}", err);
                        break;
                    }
                },
                Ok(false) if tx.is_closed() => break,
                Ok(false) => {}
                Err(err) => {
                    log::error!("Failed to poll terminal events: {}", err);
                    break;
                }
            }
        }
    })
}

async fn run(log_buffer: log_capture::LogBuffer) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(std::io::stderr()))?;
    let mut app = App::new(Config::load(), log_buffer).context("Failed to start command menu")?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let event_task = start_event_handler(event_tx);
    // The debug console has no store to subscribe to, so it redraws on a tick
    let mut tick = tokio::time::interval(Duration::from_millis(250));

    while !app.should_quit() {
        if app.take_dirty() || app.debug_console.open {
            terminal.draw(|f| views::render(f, &app))?;
        }

        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => app.handle_event(event)?,
                None => break,
            },
            _ = tick.tick() => {}
        }
    }

    drop(event_rx);
    event_task.await.context("Event handler panicked")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize debug console logger before anything else
    let log_buffer = log_capture::init_logger()?;

    initialize_panic_handler();
    startup()?;
    let result = run(log_buffer).await;
    shutdown()?;
    result
}
