use miette::Diagnostic;
use thiserror::Error;

use crate::parser::Span;

/// Main error type for shoal operations
#[derive(Error, Diagnostic, Debug)]
pub enum LevelError {
    #[error("IO error: {0}")]
    #[diagnostic(code(shoal::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(shoal::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Invalid level format at {span}: {message}")]
    #[diagnostic(
        code(shoal::syntax),
        help("Level files are literal mappings of eight named layers keyed by (x, y) tuples")
    )]
    Syntax { message: String, span: Span },

    #[error("Invalid level format: {message}")]
    #[diagnostic(code(shoal::format))]
    InvalidFormat {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid level format: unknown item '{subtype}' in category '{category}'")]
    #[diagnostic(
        code(shoal::unknown_item),
        help("Check the catalog section of shoal.yaml")
    )]
    UnknownItem { category: String, subtype: String },

    #[error("Refusing to overwrite existing level {path}")]
    #[diagnostic(
        code(shoal::export_conflict),
        help("Wait a second and export again, or move the existing file")
    )]
    ExportConflict { path: std::path::PathBuf },

    #[error("{message}")]
    #[diagnostic(code(shoal::command))]
    Command {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(shoal::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl LevelError {
    /// Shorthand for a shape/type violation without help text.
    pub fn format(message: impl Into<String>) -> Self {
        LevelError::InvalidFormat {
            message: message.into(),
            help: None,
        }
    }

    /// True for every error the editor reports as "invalid level format".
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self,
            LevelError::Syntax { .. } | LevelError::InvalidFormat { .. } | LevelError::UnknownItem { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LevelError>;
