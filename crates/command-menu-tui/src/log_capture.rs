//! In-memory log capture for the debug console
//!
//! The terminal is in raw mode while the menu runs, so regular log output would
//! corrupt the screen. Records are kept in a bounded buffer instead and only
//! errors reach stderr.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const CAPACITY: usize = 500;

/// Modules captured when `RUST_LOG` is unset
const DEFAULT_MODULES: [&str; 2] = ["command_menu_tui", "command_menu"];

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

pub type LogBuffer = Arc<Mutex<VecDeque<LogEntry>>>;

pub fn create_buffer() -> LogBuffer {
    Arc::new(Mutex::new(VecDeque::with_capacity(CAPACITY)))
}

/// Copy of the newest `limit` entries, oldest first, plus the total held
pub fn tail(buffer: &LogBuffer, limit: usize) -> (Vec<LogEntry>, usize) {
    match buffer.lock() {
        Ok(logs) => {
            let skip = logs.len().saturating_sub(limit);
            (logs.iter().skip(skip).cloned().collect(), logs.len())
        }
        Err(_) => (Vec::new(), 0),
    }
}

/// Sends records to the capture buffer and, at Error, to env_logger on stderr
pub struct CaptureLogger {
    buffer: LogBuffer,
    capture_filter: env_logger::Logger,
    stderr: env_logger::Logger,
}

impl CaptureLogger {
    pub fn new(buffer: LogBuffer) -> Self {
        let capture_filter = if std::env::var("RUST_LOG").is_ok() {
            env_logger::Builder::from_default_env().build()
        } else {
            let mut builder = env_logger::Builder::new();
            for module in DEFAULT_MODULES {
                builder.filter_module(module, LevelFilter::Debug);
            }
            builder.build()
        };

        Self {
            buffer,
            capture_filter,
            stderr: env_logger::Builder::new()
                .filter_level(LevelFilter::Error)
                .build(),
        }
    }

    fn push(&self, record: &Record) {
        let Ok(mut logs) = self.buffer.lock() else {
            return;
        };
        if logs.len() == CAPACITY {
            logs.pop_front();
        }
        logs.push_back(LogEntry {
            timestamp: Utc::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        });
    }
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.capture_filter.enabled(metadata) || self.stderr.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.capture_filter.matches(record) {
            self.push(record);
        }
        if self.stderr.matches(record) {
            self.stderr.log(record);
        }
    }

    fn flush(&self) {
        self.stderr.flush();
    }
}

/// Install the capture logger and return the buffer the UI reads from
///
/// `RUST_LOG` replaces the default module list, e.g.
/// `RUST_LOG=command_menu=trace` to see every scheduled task.
pub fn init_logger() -> Result<LogBuffer> {
    let buffer = create_buffer();
    log::set_boxed_logger(Box::new(CaptureLogger::new(buffer.clone())))
        .context("Failed to initialize logger")?;
    log::set_max_level(LevelFilter::Trace);

    log::info!("Debug console ready, press ` to toggle");
    Ok(buffer)
}
