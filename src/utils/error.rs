use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("File not found: {}", .path.display())]
    FileNotFoundError { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Remote query failed (HTTP {status}{}): {message}", code_suffix(.code))]
    RemoteQueryError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(", code {}", c))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    FileSystem,
    Network,
    Remote,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that ended with an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ToolError {
    pub fn config(message: impl Into<String>) -> Self {
        ToolError::ConfigError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        ToolError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolError::ApiError(_) => ErrorCategory::Network,
            ToolError::IoError(_) | ToolError::FileNotFoundError { .. } => {
                ErrorCategory::FileSystem
            }
            ToolError::SerializationError(_) | ToolError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            ToolError::ConfigError { .. }
            | ToolError::MissingConfigError { .. }
            | ToolError::InvalidConfigValueError { .. }
            | ToolError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            ToolError::RemoteQueryError { .. } => ErrorCategory::Remote,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::FileSystem => ErrorSeverity::High,
            ErrorCategory::Processing => match self {
                ToolError::SerializationError(_) => ErrorSeverity::Medium,
                _ => ErrorSeverity::High,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ToolError::ApiError(_) => {
                "Check the network connection and the Supabase project URL".to_string()
            }
            ToolError::IoError(_) => {
                "Check file permissions and that the project root is correct".to_string()
            }
            ToolError::FileNotFoundError { path } => format!(
                "Make sure {} exists and the path is right",
                path.display()
            ),
            ToolError::MissingConfigError { field } => format!(
                "Set {} in the environment or in a .env file in the working directory",
                field
            ),
            ToolError::InvalidConfigValueError { field, .. }
            | ToolError::ConfigValidationError { field, .. } => {
                format!("Fix the value of {} and run again", field)
            }
            ToolError::ConfigError { .. } => {
                "Review the command line arguments and configuration file".to_string()
            }
            ToolError::RemoteQueryError { .. } => {
                "Run the SQL script manually in the Supabase SQL Editor".to_string()
            }
            ToolError::SerializationError(_) | ToolError::ProcessingError { .. } => {
                "Run again with --verbose to inspect the failing step".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ToolError::ApiError(e) if e.is_timeout() => {
                "The database request timed out".to_string()
            }
            ToolError::ApiError(e) if e.is_connect() => {
                "Could not connect to the database API".to_string()
            }
            ToolError::FileNotFoundError { path } => {
                format!("File {} was not found", path.display())
            }
            ToolError::MissingConfigError { field } => {
                format!("Required setting {} is not configured", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
