//! Log callback system.
//!
//! The pane never writes to stdout/stderr itself. Hosts that want diagnostics
//! install a callback; until then every [`emit_log`] is a cheap no-op.

use std::sync::{Mutex, OnceLock};

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    let mut guard = log_callback().lock().expect("log callback lock");
    *guard = Some(Box::new(callback));
}

/// Remove the global log callback.
pub fn clear_log_callback() {
    if let Ok(mut guard) = log_callback().lock() {
        *guard = None;
    }
}

/// Emit a log event.
pub fn emit_log(level: LogLevel, message: &str) {
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}

/// Emit a lazily formatted log event.
///
/// The message is only built when a callback is installed, so render and
/// hit-test paths can log without paying for `format!` in the common case.
pub fn emit_log_with<F>(level: LogLevel, message: F)
where
    F: FnOnce() -> String,
{
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, &message());
        }
    }
}
