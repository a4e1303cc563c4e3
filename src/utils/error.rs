use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Feed {url} responded with status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("Feed payload is not valid JSON: {source}")]
    PayloadParseError {
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::PayloadParseError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Data
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Storage,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 單一來源失敗只會跳過該來源
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => {
                "A feed request timed out".to_string()
            }
            EtlError::ApiError(_) => "Could not reach a feed endpoint".to_string(),
            EtlError::HttpStatusError { url, status } => {
                format!("Feed {} answered with HTTP {}", url, status)
            }
            EtlError::PayloadParseError { .. } => {
                "A feed returned a payload that is not valid JSONP".to_string()
            }
            EtlError::SerializationError(_) => "Failed to serialize the export".to_string(),
            EtlError::ConfigError { message } => format!("Configuration problem: {}", message),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            EtlError::InvalidConfigValueError { field, value, reason } => {
                format!("Setting '{}' has invalid value '{}': {}", field, value, reason)
            }
            EtlError::IoError(e) => format!("Could not write output: {}", e),
            EtlError::ZipError(e) => format!("Could not build archive: {}", e),
            EtlError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the feed URL and your network connection",
            ErrorCategory::Data => "Verify the feed still returns widgetCallback(...) JSONP",
            ErrorCategory::Configuration => "Review --help or the TOML configuration file",
            ErrorCategory::Storage => "Check that the output path exists and is writable",
            ErrorCategory::Processing => "Re-run with --verbose and inspect the logs",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = EtlError::MissingConfigError {
            field: "source.urls".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("source.urls"));
    }

    #[test]
    fn test_parse_error_is_data_category() {
        let source = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err = EtlError::PayloadParseError { source };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_status_error_message_names_url() {
        let err = EtlError::HttpStatusError {
            url: "https://tickets.example.com/feed".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "Feed https://tickets.example.com/feed responded with status 503"
        );
    }
}
