//! CLI error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// The remote operation a transport error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Download,
    FileInfo,
    BlockchainRecord,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Upload => "Upload",
            Operation::Download => "Download",
            Operation::FileInfo => "File info lookup",
            Operation::BlockchainRecord => "Blockchain record lookup",
        };
        f.write_str(name)
    }
}

/// CLI error enum covering validation, transport and configuration failures.
#[derive(Debug, Error)]
pub enum CliError {
    /// The share URL or identifier could not be reduced to an identifier.
    #[error("Invalid share URL format")]
    InvalidShareRef,

    /// Upload source does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A shell verb was given the wrong number of arguments.
    #[error("{message}")]
    Usage {
        message: String,
        usage: &'static str,
    },

    /// A shell verb nobody recognizes.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server answered with a non-success status.
    #[error("{op} failed: Server returned {status}")]
    Status { op: Operation, status: u16 },

    /// The request timed out.
    #[error("{op} failed: Request timed out")]
    Timeout { op: Operation },

    /// Connection refused or no answer at all.
    #[error("{op} failed: No response received from server")]
    NoResponse { op: Operation },

    /// Any other transport failure. Details only go to the debug log.
    #[error("{op} failed: Could not complete request")]
    Transport { op: Operation },

    /// The platform browser opener failed.
    #[error("Could not open browser: {0}")]
    Browser(String),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a usage error for a shell verb.
    pub fn usage(msg: impl Into<String>, usage: &'static str) -> Self {
        Self::Usage {
            message: msg.into(),
            usage,
        }
    }

    /// Map a reqwest failure onto the transport taxonomy.
    pub fn transport(op: Operation, err: reqwest::Error) -> Self {
        tracing::debug!(%op, error = %err, "transport failure");
        if let Some(status) = err.status() {
            Self::Status {
                op,
                status: status.as_u16(),
            }
        } else if err.is_timeout() {
            Self::Timeout { op }
        } else if err.is_connect() {
            Self::NoResponse { op }
        } else {
            Self::Transport { op }
        }
    }

    /// Whether this is a Ctrl-C surfacing from a terminal prompt.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::Interrupted)
    }

    /// Whether this error is a user input problem rather than a failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidShareRef
                | Self::FileNotFound(_)
                | Self::Usage { .. }
                | Self::UnknownCommand(_)
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidShareRef | Self::FileNotFound(_) | Self::Browser(_) => 1,
            Self::Usage { .. } | Self::UnknownCommand(_) => 2,
            Self::Config(_) | Self::Json(_) => 3,
            Self::Status { .. }
            | Self::Timeout { .. }
            | Self::NoResponse { .. }
            | Self::Transport { .. } => 5,
            Self::Io(_) => 9,
        }
    }
}
