//! # Error Handling
//!
//! Error types for the visualizer and the evaluation runner. Every error carries an
//! [`ErrorContext`] with the operation being performed, free-form context, a severity
//! and an optional recovery suggestion.
//!
//! ## Error Classification
//!
//! - `HasSeverity`: how loud the error should be logged
//! - `Recoverable`: whether the caller can keep going (a dropped frame) or not
//!   (a window that never opened)
//! - `HasRecoverySuggestion`: a hint printed next to the error
//!
//! Conversion errors on frame submission are never returned to the producer; they
//! exist so the visualizer can log them before dropping the frame.
//!
//! ## Usage
//!
//! ```rust
//! use drive_viz::error::{Recoverable, VizError};
//!
//! let error = VizError::conversion("raw buffer shorter than 640x480x3")
//!     .with_operation("submit_frame");
//! assert!(error.is_recoverable());
//! ```

use std::{error::Error as StdError, fmt, path::PathBuf};

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Debug-level errors that don't affect operation
    Debug,
    /// Warnings that may indicate potential issues
    Warning,
    /// Errors that affect operation but can be recovered from
    Error,
    /// Fatal errors that cannot be recovered from
    Fatal,
}

/// Metadata about where an error occurred and how loud it is
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: Option<String>,
    pub context: Option<String>,
    pub recovery_suggestion: Option<String>,
    pub severity: ErrorSeverity,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Base error type for drive-viz
#[derive(Debug)]
pub enum VizError {
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// The display surface could not be created
    DisplayInit {
        backend: String,
        reason: String,
        context: ErrorContext,
    },
    /// A submitted image could not be normalised to RGB8
    Conversion { reason: String, context: ErrorContext },
    /// Drawing or presenting a tick failed
    Render {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<PathBuf>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Evaluator subprocess errors
    Process {
        program: String,
        reason: String,
        context: ErrorContext,
    },
    /// Result checkpoint could not be read or parsed
    Checkpoint {
        path: PathBuf,
        reason: String,
        context: ErrorContext,
    },
}

impl VizError {
    pub fn config(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn display_init(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DisplayInit {
            backend: backend.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    pub fn conversion(reason: impl Into<String>) -> Self {
        Self::Conversion {
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Debug),
        }
    }

    pub fn render(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Warning),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    pub fn io_at(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: Some(path.into()),
            source,
            context: ErrorContext::new(),
        }
    }

    pub fn process(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Process {
            program: program.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn checkpoint(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Checkpoint {
            path: path.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Warning),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::DisplayInit { context, .. } => context,
            Self::Conversion { context, .. } => context,
            Self::Render { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Process { context, .. } => context,
            Self::Checkpoint { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Config { context, .. } => context,
            Self::DisplayInit { context, .. } => context,
            Self::Conversion { context, .. } => context,
            Self::Render { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Process { context, .. } => context,
            Self::Checkpoint { context, .. } => context,
        }
    }

    /// Short category name, used as a log tag
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::DisplayInit { .. } => "display",
            Self::Conversion { .. } => "conversion",
            Self::Render { .. } => "render",
            Self::Io { .. } => "io",
            Self::Process { .. } => "process",
            Self::Checkpoint { .. } => "checkpoint",
        }
    }
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { field, value, reason, .. } => {
                write!(f, "Invalid configuration for '{}' = '{}': {}", field, value, reason)?
            }
            Self::DisplayInit { backend, reason, .. } => {
                write!(f, "Failed to create {} display surface: {}", backend, reason)?
            }
            Self::Conversion { reason, .. } => write!(f, "Frame conversion failed: {}", reason)?,
            Self::Render { operation, reason, .. } => write!(f, "Render error during {}: {}", operation, reason)?,
            Self::Io { operation, path, source, .. } => match path {
                Some(path) => write!(f, "I/O error during {} ({}): {}", operation, path.display(), source)?,
                None => write!(f, "I/O error during {}: {}", operation, source)?,
            },
            Self::Process { program, reason, .. } => write!(f, "Process '{}' failed: {}", program, reason)?,
            Self::Checkpoint { path, reason, .. } => {
                write!(f, "Failed to read checkpoint {}: {}", path.display(), reason)?
            }
        }

        let context = self.context();
        if let Some(operation) = &context.operation {
            write!(f, " [operation: {}]", operation)?;
        }
        if let Some(extra) = &context.context {
            write!(f, " ({})", extra)?;
        }
        Ok(())
    }
}

impl StdError for VizError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Trait for errors that can be recovered from
pub trait Recoverable {
    fn is_recoverable(&self) -> bool;
}

impl Recoverable for VizError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Conversion { .. } | Self::Render { .. } | Self::Checkpoint { .. } => true,
            Self::DisplayInit { .. } | Self::Config { .. } => false,
            Self::Io { .. } | Self::Process { .. } => false,
        }
    }
}

pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for VizError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for VizError {
    fn recovery_suggestion(&self) -> Option<&str> {
        if let Some(suggestion) = self.context().recovery_suggestion.as_deref() {
            return Some(suggestion);
        }
        match self {
            Self::DisplayInit { .. } => Some("Check that DISPLAY is set and an X11/Wayland session is reachable"),
            Self::Checkpoint { .. } => Some("Inspect error.log in the output directory"),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VizError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<image::ImageError> for VizError {
    fn from(error: image::ImageError) -> Self {
        Self::conversion(error.to_string())
    }
}

impl From<viz_scale::cpu::ScaleError> for VizError {
    fn from(error: viz_scale::cpu::ScaleError) -> Self {
        Self::render("scale", error.to_string())
    }
}

/// Result alias used throughout the library
pub type VizResult<T> = Result<T, VizError>;
