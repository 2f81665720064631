/// Structured logging for the apron analysis service
///
/// Provides context-rich logging with component tags, optional row or flight
/// identifiers, timestamps, and severity levels. Supports both console
/// output and file-based logging for batch runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl LogLevel {
    /// Parses `debug`, `info`, `warn`/`warning` or `error`, ignoring case.
    pub fn from_name(name: &str) -> Option<LogLevel> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Ingest,
    Normalizer,
    Scanner,
    Occupancy,
    Config,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Ingest => write!(f, "INGEST"),
            Component::Normalizer => write!(f, "NORM"),
            Component::Scanner => write!(f, "SCAN"),
            Component::Occupancy => write!(f, "OCC"),
            Component::Config => write!(f, "CFG"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

/// Sink settings for one run. Every entry goes to the console; with a log
/// file set, the full timestamped line is appended there as well.
pub struct Logger {
    threshold: LogLevel,
    file: Option<String>,
    /// Print the full file-format line on the console instead of the short form.
    verbose_console: bool,
}

impl Logger {
    fn format_entry(
        level: LogLevel,
        component: Component,
        context: Option<&str>,
        message: &str,
    ) -> String {
        format!(
            "{} {} {}{}: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            level,
            component,
            Self::tag(context),
            message
        )
    }

    fn tag(context: Option<&str>) -> String {
        context.map(|c| format!(" [{}]", c)).unwrap_or_default()
    }

    fn console_line(
        level: LogLevel,
        component: Component,
        context: Option<&str>,
        message: &str,
    ) -> String {
        let tag = Self::tag(context);
        match level {
            LogLevel::Error => format!("   ✗ {}{}: {}", component, tag, message),
            LogLevel::Warning => format!("   ⚠ {}{}: {}", component, tag, message),
            LogLevel::Info => format!("   {}", message),
            LogLevel::Debug => format!("   [DEBUG] {}{}: {}", component, tag, message),
        }
    }

    fn write(&self, level: LogLevel, component: Component, context: Option<&str>, message: &str) {
        if level < self.threshold {
            return;
        }

        let entry = Self::format_entry(level, component, context, message);
        let line = if self.verbose_console {
            entry.clone()
        } else {
            Self::console_line(level, component, context, message)
        };
        if level >= LogLevel::Warning {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }

        if let Some(path) = &self.file {
            let appended = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .and_then(|mut f| writeln!(f, "{}", entry));
            if let Err(e) = appended {
                eprintln!("cannot append to log file {}: {}", path, e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Installs the process-wide logger. Log calls made before this are dropped.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(Logger {
            threshold: min_level,
            file: log_file.map(String::from),
            verbose_console: console_timestamps,
        });
    }
}

fn emit(level: LogLevel, component: Component, context: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock()
        && let Some(logger) = guard.as_ref()
    {
        logger.write(level, component, context, message);
    }
}

pub fn info(component: Component, context: Option<&str>, message: &str) {
    emit(LogLevel::Info, component, context, message);
}

pub fn warn(component: Component, context: Option<&str>, message: &str) {
    emit(LogLevel::Warning, component, context, message);
}

pub fn error(component: Component, context: Option<&str>, message: &str) {
    emit(LogLevel::Error, component, context, message);
}

/// Per-row detail, off unless the level is set to debug.
pub fn debug(component: Component, context: Option<&str>, message: &str) {
    emit(LogLevel::Debug, component, context, message);
}

// ---------------------------------------------------------------------------
// Structured Helpers
// ---------------------------------------------------------------------------

/// Log one discarded input row.
pub fn log_discard(row_number: usize, reason: &str) {
    let context = format!("row {}", row_number);
    warn(Component::Normalizer, Some(&context), &format!("discarded: {}", reason));
}

/// Log the outcome of one scan. An empty result is a normal outcome and is
/// logged at info level like any other.
pub fn log_scan_summary(component: Component, scan: &str, qualifying: usize, flagged: usize) {
    let message = if qualifying == 0 {
        format!("{}: no qualifying groups", scan)
    } else {
        format!(
            "{}: {} qualifying, {} over passenger threshold",
            scan, qualifying, flagged
        )
    };
    info(component, None, &message);
}

/// Log the data-health summary of a normalization pass.
pub fn log_normalization_summary(total: usize, valid: usize, filtered: usize, discarded: usize) {
    let message = format!(
        "Normalization complete: {}/{} rows valid, {} out of scope, {} discarded",
        valid, total, filtered, discarded
    );

    if discarded == 0 {
        info(Component::Normalizer, None, &message);
    } else if valid == 0 {
        error(Component::Normalizer, None, &message);
    } else {
        warn(Component::Normalizer, None, &message);
    }
}
