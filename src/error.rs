use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for mreleaser operations
#[derive(Error, Debug)]
pub enum MreleaserError {
    #[error("Not a git repository (or any parent up to the filesystem root): {}", path.display())]
    NotAGitRepository { path: PathBuf },

    #[error("dirty repository")]
    DirtyRepository,

    #[error("no bump needed: version {version} has no qualifying commits since its tag")]
    NoBumpAvailable { version: String },

    #[error("invalid command: {command}")]
    InvalidCommand { command: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in mreleaser
pub type Result<T> = std::result::Result<T, MreleaserError>;

impl MreleaserError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        MreleaserError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        MreleaserError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        MreleaserError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        MreleaserError::Remote(msg.into())
    }

    pub fn invalid_command(command: impl Into<String>) -> Self {
        MreleaserError::InvalidCommand {
            command: command.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// Usage errors exit with 2, every other failure with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            MreleaserError::InvalidCommand { .. } => 2,
            _ => 1,
        }
    }
}
