//! Logging service implementation

use super::config;
use super::events::{LogEvent, LogLevel};
use crate::config::constants::compile_time::logging::MAX_LOG_EVENTS;
use chrono::{DateTime, Local};
use std::sync::{Arc, Mutex};

/// Simple logger trait
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    /// Create new logging service with specified logger and minimum level
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service with configuration-aware settings
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if config::use_structured_logging() {
            Arc::new(StructuredLogger)
        } else {
            Arc::new(ConsoleLogger)
        };

        Self::new(logger, min_level)
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    /// Log an event
    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }
}

/// Create the service the global registry installs.
pub fn create_configured_service() -> LoggingService {
    LoggingService::with_config()
}

/// Simple console logger. Errors and warnings go to stderr, everything
/// else to stdout, each line stamped with the local time.
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        let stamp: DateTime<Local> = event.timestamp.into();
        let line = format!("{} {}", stamp.format("%H:%M:%S%.3f"), event.format());
        if event.is_error() || event.is_warning() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

/// JSON-lines logger for machine consumption.
pub struct StructuredLogger;

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(json) = event.format_json() {
            if event.is_error() || event.is_warning() {
                eprintln!("{}", json);
            } else {
                println!("{}", json);
            }
        }
    }
}

/// In-memory logger, primarily for testing.
#[derive(Default)]
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            if events.len() < MAX_LOG_EVENTS {
                events.push(event.clone());
            }
        }
    }
}
