//! # Error Handling
//!
//! Every failure the slicer can report is a [`SliceError`]. The taxonomy
//! covers what can go wrong between "bytes in" and "four
//! JPEGs out":
//!
//! - `Decode`: the source bytes are not a supported raster image
//! - `Bounds`: a crop rectangle leaves its image, or the cells fail to tile
//! - `Encode`: the compressor rejected a finished buffer
//! - `Config`: a tuning value is out of range (multiplier, quality, fade)
//! - `Processing`: a cell worker died before returning
//! - `Io`: reading the input file or writing outputs (CLI layer only)
//!
//! None of these are retried. A failure in any cell fails the whole call,
//! since a grid post with fewer than four images breaks the effect.
//!
//! ```rust
//! use grid_reveal::error::{HasRecoverySuggestion, SliceError};
//!
//! let error = SliceError::bounds("crop", "rectangle exceeds image")
//!     .with_context("cropping 1200x800 at 0,0 from 1000x800")
//!     .with_recovery_suggestion("clamp the crop rectangle to the image");
//!
//! assert_eq!(error.category(), "bounds");
//! assert!(error.recovery_suggestion().is_some());
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt};

use reveal_scale::cpu::ScaleError;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Warning,
    Error,
    /// Caller broke a contract (bad crop, bad configuration)
    Fatal,
}

/// Metadata about where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Base error type for the slicer
#[derive(Debug)]
pub enum SliceError {
    /// Source bytes are not a valid or supported raster image
    Decode {
        reason: String,
        context: ErrorContext,
    },
    /// A rectangle is not contained in its buffer, or cells fail to tile
    Bounds {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// The compressor rejected a buffer
    Encode {
        index: Option<usize>,
        reason: String,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// A cell worker panicked or was cancelled
    Processing {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
}

impl SliceError {
    /// Create a decode error
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create a bounds error
    pub fn bounds(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Bounds {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create an encode error
    pub fn encode(index: Option<usize>, reason: impl Into<String>) -> Self {
        Self::Encode {
            index,
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Create a processing error
    pub fn processing(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Processing {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Attach the file path an I/O error refers to
    pub fn with_path(mut self, p: impl Into<String>) -> Self {
        if let Self::Io { path, .. } = &mut self {
            *path = Some(p.into());
        }
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Decode { context, .. } => context,
            Self::Bounds { context, .. } => context,
            Self::Encode { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::Io { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Decode { context, .. } => context,
            Self::Bounds { context, .. } => context,
            Self::Encode { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Processing { context, .. } => context,
            Self::Io { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Decode { .. } => "decode",
            Self::Bounds { .. } => "bounds",
            Self::Encode { .. } => "encode",
            Self::Config { .. } => "config",
            Self::Processing { .. } => "processing",
            Self::Io { .. } => "io",
        }
    }
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceError::Decode { reason, .. } => write!(f, "Decode error: {}", reason),
            SliceError::Bounds {
                operation, reason, ..
            } => write!(f, "Bounds error in '{}': {}", operation, reason),
            SliceError::Encode {
                index: Some(index),
                reason,
                ..
            } => write!(f, "Encode error for image {}: {}", index, reason),
            SliceError::Encode { reason, .. } => write!(f, "Encode error: {}", reason),
            SliceError::Config {
                field,
                value,
                reason,
                ..
            } => write!(
                f,
                "Configuration error in '{}': {} (value: {})",
                field, reason, value
            ),
            SliceError::Processing {
                operation, reason, ..
            } => write!(f, "Processing error in '{}': {}", operation, reason),
            SliceError::Io {
                operation,
                path: Some(path),
                source,
                ..
            } => write!(f, "I/O error during '{}' on {}: {}", operation, path, source),
            SliceError::Io {
                operation, source, ..
            } => write!(f, "I/O error during '{}': {}", operation, source),
        }?;

        if let Some(context) = &self.context().context {
            write!(f, " ({})", context)?;
        }
        Ok(())
    }
}

impl StdError for SliceError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type SliceResult<T> = Result<T, SliceError>;

/// Trait for errors with severity levels
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for SliceError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for SliceError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

impl From<std::io::Error> for SliceError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<image::ImageError> for SliceError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::IoError(e) => Self::io("image", e),
            image::ImageError::Encoding(e) => Self::encode(None, e.to_string()),
            other => Self::decode(other.to_string()),
        }
    }
}

impl From<ScaleError> for SliceError {
    fn from(error: ScaleError) -> Self {
        match error {
            ScaleError::SourceOutOfBounds(reason) => Self::bounds("blit source", reason),
            ScaleError::DestOutOfBounds(reason) => Self::bounds("blit destination", reason),
            ScaleError::CanvasTooLarge { cell_height, multiplier, max } => Self::config(
                "multiplier",
                multiplier.to_string(),
                format!("a {}-row cell would need more than {} output rows", cell_height, max),
            )
            .with_recovery_suggestion("lower the reveal multiplier or use a smaller crop"),
            ScaleError::Untileable(reason) => Self::bounds("tiling", reason)
                .with_recovery_suggestion("use a crop of at least 2x2 (landscape) or 1x4 (portrait) pixels"),
            other => Self::processing("resample", other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for SliceError {
    fn from(error: tokio::task::JoinError) -> Self {
        let reason = if error.is_panic() {
            "cell worker panicked".to_string()
        } else {
            "cell worker was cancelled".to_string()
        };
        Self::processing("cell fan-out", reason).with_context(error.to_string())
    }
}
