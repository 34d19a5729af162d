use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid input: {message}")]
    InputError { message: String },

    #[error("No valid assignment found after {attempts} attempts")]
    ConstraintUnsatisfiable { attempts: usize },

    #[error("Internal consistency error: {message}")]
    ConsistencyError { message: String },

    #[error("Data error at row {row}: {message}")]
    DataError { row: usize, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Constraint,
    Storage,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::InputError {
            message: message.into(),
        }
    }

    pub fn consistency(message: impl Into<String>) -> Self {
        Self::ConsistencyError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::InputError { .. } | Self::DataError { .. } | Self::CsvError(_) => {
                ErrorCategory::Input
            }
            Self::ConstraintUnsatisfiable { .. } => ErrorCategory::Constraint,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) | Self::ConsistencyError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// Medium means "run again", High means "fix the data or config",
    /// Critical means a bug.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Constraint => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input | ErrorCategory::Storage => {
                ErrorSeverity::High
            }
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    /// 2 = try again, 1 = fix the input, 3 = bug.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConstraintUnsatisfiable { .. } => {
                "Run again, raise --max-attempts, or trim old periods from the history file"
            }
            Self::InputError { .. } => "Provide at least two participants with unique ids",
            Self::DataError { .. } | Self::CsvError(_) => {
                "Check the CSV headers (Employee_Name, Employee_EmailID) and fix the reported row"
            }
            Self::IoError(_) => "Check that the data directory exists and is readable and writable",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration value and try again"
            }
            Self::SerializationError(_) | Self::ConsistencyError { .. } => {
                "This is a bug; please report it together with the input files"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConstraintUnsatisfiable { attempts } => format!(
                "Could not find a Secret Santa assignment that avoids every past pairing ({} attempts)",
                attempts
            ),
            Self::InputError { message } => format!("Failed to load participant data: {}", message),
            Self::DataError { row, message } => {
                format!("Problem in input file at row {}: {}", row, message)
            }
            Self::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
