use chrono::Utc;
use serde_json::json;

use crate::utils::generate_log_id;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// Logger struct for handling structured logging
pub struct Logger {
    request_id: String,
}

impl Logger {
    /// Create a new Logger instance
    ///
    /// # Arguments
    ///
    /// * `request_id` - A unique identifier for the current request
    pub fn new(request_id: String) -> Self {
        Self { request_id }
    }

    /// Create a Logger with a freshly generated request id
    pub fn for_request() -> Self {
        Self::new(generate_log_id())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Log an info message
    pub fn info(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Info, message, data);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Warn, message, data);
    }

    /// Log an error message
    pub fn error(&self, message: &str, data: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, data);
    }

    /// Render one JSON log line
    ///
    /// # Arguments
    ///
    /// * `level` - The log level
    /// * `message` - The log message
    /// * `data` - Optional additional data to include in the log
    pub fn format(&self, level: LogLevel, message: &str, data: Option<serde_json::Value>) -> String {
        json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level.as_str(),
            "request_id": self.request_id,
            "message": message,
            "data": data
        })
        .to_string()
    }

    fn log(&self, level: LogLevel, message: &str, data: Option<serde_json::Value>) {
        emit(level, &self.format(level, message, data));
    }
}

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        fn emit(level: LogLevel, line: &str) {
            match level {
                LogLevel::Info => worker::console_log!("{}", line),
                LogLevel::Warn => worker::console_warn!("{}", line),
                LogLevel::Error => worker::console_error!("{}", line),
            }
        }
    } else {
        // Outside the Workers runtime there is no console; hand lines to `log`.
        fn emit(level: LogLevel, line: &str) {
            match level {
                LogLevel::Info => log::info!("{}", line),
                LogLevel::Warn => log::warn!("{}", line),
                LogLevel::Error => log::error!("{}", line),
            }
        }
    }
}

/// Macro to create a JSON object for additional log data
///
/// Usage: log_data!("key1" => "value1", "key2" => 42)
#[macro_export]
macro_rules! log_data {
    ($($key:expr => $value:expr),* $(,)?) => {
        Some(serde_json::json!({ $($key: $value),* }))
    };
}
