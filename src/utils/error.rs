use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Store request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Store returned {status}: {message}")]
    StoreError { status: u16, message: String },

    #[error("Booking {id} not found")]
    BookingNotFound { id: i64 },

    #[error("Invalid month '{value}': {reason}")]
    InvalidMonth { value: String, reason: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Report processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    Storage,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl UsageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            UsageError::ApiError(e) if e.is_decode() => ErrorCategory::Data,
            UsageError::ApiError(_) | UsageError::StoreError { .. } => ErrorCategory::Network,
            UsageError::ZipError(_) | UsageError::IoError(_) => ErrorCategory::Storage,
            UsageError::CsvError(_)
            | UsageError::SerializationError(_)
            | UsageError::ProcessingError { .. } => ErrorCategory::Data,
            UsageError::MissingConfigError { .. }
            | UsageError::InvalidConfigValueError { .. }
            | UsageError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            UsageError::BookingNotFound { .. }
            | UsageError::InvalidMonth { .. }
            | UsageError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            UsageError::BookingNotFound { .. } => ErrorSeverity::Low,
            UsageError::ApiError(e) if !e.is_decode() => ErrorSeverity::Medium,
            UsageError::StoreError { status, .. } if *status >= 500 || *status == 429 => {
                ErrorSeverity::Medium
            }
            UsageError::IoError(_) | UsageError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Process exit code for the command line tools.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the store URL is reachable and the API key is valid, then retry"
            }
            ErrorCategory::Storage => "Check that the output location exists and is writable",
            ErrorCategory::Data => "Inspect the rows returned by the store for malformed values",
            ErrorCategory::Configuration => {
                "Review the command line flags, environment variables or config file"
            }
            ErrorCategory::Validation => "Correct the input values and try again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            UsageError::StoreError { status: 401, .. } | UsageError::StoreError { status: 403, .. } => {
                "The booking store rejected the API key".to_string()
            }
            UsageError::ApiError(e) if e.is_decode() => {
                format!("The booking store returned rows that could not be read: {}", e)
            }
            UsageError::ApiError(_) | UsageError::StoreError { .. } => {
                format!("Could not talk to the booking store: {}", self)
            }
            UsageError::BookingNotFound { id } => format!("No booking with id {} exists", id),
            UsageError::InvalidMonth { value, .. } => {
                format!("'{}' is not a valid month, expected YYYY-MM", value)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UsageError>;
