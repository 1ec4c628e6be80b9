use thiserror::Error;

/// Main error type for KinMcp
#[derive(Error, Debug)]
pub enum KinmcpError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse errors (CSV / JSON member files)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Import batch rejected as a whole (blank name, ids exhausted)
    #[error("Import error: {0}")]
    Import(String),

    /// MCP protocol errors
    #[error("MCP protocol error: {0}")]
    McpProtocol(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using KinmcpError
pub type Result<T> = std::result::Result<T, KinmcpError>;
