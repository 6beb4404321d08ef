//! Error types for cryptodash, grouped by how the dashboard recovers:
//!
//! - **Recovered locally**: transport, validation, layout and launch errors
//!   never stop the dashboard. They are dropped, logged, or shown on the
//!   status line.
//! - **Fatal**: initialization, configuration and I/O errors end the process
//!   after the terminal has been restored.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the dashboard engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Data source unreachable or returned a malformed response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A single raw record failed validation and was dropped.
    #[error("Invalid record field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    /// Terminal is below the minimum usable size.
    #[error("Terminal too small: {cols}x{rows}")]
    TerminalTooSmall { rows: u16, cols: u16 },

    /// The external open-URL call failed.
    #[error("Failed to open '{target}': {reason}")]
    Launch { target: String, reason: String },

    /// The rendering backend failed to start.
    #[error("Failed to initialize terminal: {0}")]
    Initialization(String),

    /// Configuration value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(String),

    /// Parsing of a config file or payload failed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The engine's message channel was closed before shutdown.
    #[error("Engine channel closed")]
    ChannelClosed,
}

impl Error {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a validation error for a record field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Create a launch error.
    pub fn launch(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Launch {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an IO error.
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Returns the process exit code for this error.
    ///
    /// Exit code scheme:
    /// - 1: User error (invalid configuration, unparseable config file)
    /// - 2: System error (IO, transport, terminal initialization)
    /// - 3: Not found (launcher unavailable)
    /// - 4: Invalid state (validation, closed engine channel)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_) | Self::Parse(_) => 1,
            Self::Transport(_)
            | Self::Io(_)
            | Self::Initialization(_)
            | Self::TerminalTooSmall { .. } => 2,
            Self::Launch { .. } => 3,
            Self::Validation { .. } | Self::ChannelClosed => 4,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::parse_error(format!("Failed to parse config: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_transport() {
        let err = Error::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_error_display_validation() {
        let err = Error::validation("rank", "not a number");
        assert_eq!(err.to_string(), "Invalid record field 'rank': not a number");
    }

    #[test]
    fn test_error_display_too_small() {
        let err = Error::TerminalTooSmall { rows: 5, cols: 20 };
        assert_eq!(err.to_string(), "Terminal too small: 20x5");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::invalid_config("x").exit_code(), 1);
        assert_eq!(Error::parse_error("x").exit_code(), 1);
        assert_eq!(Error::io_error("x").exit_code(), 2);
        assert_eq!(Error::Initialization("x".into()).exit_code(), 2);
        assert_eq!(Error::launch("u", "x").exit_code(), 3);
        assert_eq!(Error::ChannelClosed.exit_code(), 4);
    }
}
