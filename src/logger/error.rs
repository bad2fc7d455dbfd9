//! Error types for the logger

use thiserror::Error;

/// Errors that can occur while setting up or adjusting logging
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to initialize log file appender: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("Failed to reload log filter: {0}")]
    Reload(#[from] tracing_subscriber::reload::Error),
}

impl LoggerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
