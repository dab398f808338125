use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Remote manifest fetch failed: {url} returned status {status}")]
    RemoteFetchError { url: String, status: u16 },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Manifest error: {message}")]
    ManifestError { message: String },
}

pub type Result<T> = std::result::Result<T, LintError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Parsing,
    Configuration,
    Manifest,
}

impl LintError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LintError::IoError(_) => ErrorCategory::Io,
            LintError::HttpError(_) | LintError::RemoteFetchError { .. } => ErrorCategory::Network,
            LintError::YamlError(_)
            | LintError::CsvError(_)
            | LintError::SerializationError(_) => ErrorCategory::Parsing,
            LintError::ConfigValidationError { .. }
            | LintError::InvalidConfigValueError { .. }
            | LintError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LintError::ManifestError { .. } => ErrorCategory::Manifest,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LintError::IoError(_) => ErrorSeverity::Critical,
            LintError::HttpError(_) | LintError::RemoteFetchError { .. } => ErrorSeverity::Medium,
            LintError::YamlError(_) | LintError::ManifestError { .. } => ErrorSeverity::High,
            LintError::CsvError(_) | LintError::SerializationError(_) => ErrorSeverity::High,
            LintError::ConfigValidationError { .. }
            | LintError::InvalidConfigValueError { .. }
            | LintError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LintError::IoError(_) => {
                "Check that the manifest path exists and is readable".to_string()
            }
            LintError::HttpError(_) => {
                "Check network connectivity and the manifest URL".to_string()
            }
            LintError::RemoteFetchError { url, .. } => format!(
                "Check that '{}' serves the manifest and allows GET requests",
                url
            ),
            LintError::YamlError(_) => {
                "Fix the YAML syntax at the reported line and column".to_string()
            }
            LintError::CsvError(_) | LintError::SerializationError(_) => {
                "Retry with --output text to inspect the raw findings".to_string()
            }
            LintError::ConfigValidationError { field, .. }
            | LintError::InvalidConfigValueError { field, .. }
            | LintError::MissingConfigError { field } => {
                format!("Review the '{}' setting", field)
            }
            LintError::ManifestError { .. } => {
                "Review the manifest against the compose service schema".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LintError::IoError(e) => format!("Cannot read the manifest: {}", e),
            LintError::HttpError(e) => format!("Cannot reach the manifest URL: {}", e),
            LintError::RemoteFetchError { url, status } => {
                format!("The server at {} answered with HTTP {}", url, status)
            }
            LintError::YamlError(e) => format!("The manifest is not valid YAML: {}", e),
            other => other.to_string(),
        }
    }
}
