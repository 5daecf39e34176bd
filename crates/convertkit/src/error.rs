//! Error types for the conversion library.
//!
//! Only programmer errors and "no converter available" are surfaced as
//! [`ConvertError`]. A converter that cannot parse its input reports a
//! no-match internally and the caller's default value is returned instead.

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code when no converter exists for the requested type.
pub const EXIT_NO_CONVERTER: u8 = 2;
/// Exit code for call-site mistakes (ambiguous target, mismatched default).
pub const EXIT_USAGE_ERROR: u8 = 3;
/// Exit code for invalid arguments to formatting helpers.
pub const EXIT_INVALID_ARGUMENT: u8 = 4;
/// Exit code for I/O failures.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Neither the target type nor the default value tells us what to produce.
    #[error("Ambiguous target: [type] and [default] are both unresolvable, cannot tell what to convert to")]
    AmbiguousTarget,

    /// The default value supplied by the caller does not fit the target type.
    #[error("Default value {value} is not an instance of target type [{target}]")]
    DefaultTypeMismatch { target: String, value: String },

    /// Dispatch exhausted structural rules, both registry tiers and bean fallback.
    #[error("No converter for type [{0}]")]
    NoConverter(String),

    /// A formatting or codec helper received input outside its domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A type name could not be parsed into a target type.
    #[error("Unknown type name: {0}")]
    UnknownType(String),

    /// Configuration error (invalid YAML, bad pattern, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Create a DefaultTypeMismatch error
    pub fn default_mismatch(target: impl ToString, value: impl ToString) -> Self {
        ConvertError::DefaultTypeMismatch {
            target: target.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid(message: impl Into<String>) -> Self {
        ConvertError::InvalidArgument(message.into())
    }

    /// True for the errors that indicate a confused call site rather than bad data.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            ConvertError::AmbiguousTarget | ConvertError::DefaultTypeMismatch { .. }
        )
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::Config(_) | ConvertError::Yaml(_) => EXIT_CONFIG_ERROR,
            ConvertError::NoConverter(_) => EXIT_NO_CONVERTER,
            ConvertError::AmbiguousTarget | ConvertError::DefaultTypeMismatch { .. } => {
                EXIT_USAGE_ERROR
            }
            ConvertError::InvalidArgument(_)
            | ConvertError::UnknownType(_)
            | ConvertError::Json(_) => EXIT_INVALID_ARGUMENT,
            ConvertError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
