use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Column '{column}' not found in {source_name}")]
    MissingColumnError { column: String, source_name: String },

    #[error("Invalid boundary data: {message}")]
    BoundaryError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MapError::CsvError(_)
            | MapError::MissingColumnError { .. }
            | MapError::BoundaryError { .. } => ErrorCategory::Input,
            MapError::SerializationError(_) | MapError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            MapError::ZipError(_) | MapError::IoError(_) | MapError::RenderError { .. } => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Output => match self {
                MapError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::High,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::MissingColumnError { .. } => {
                "Check the CSV header or override the column name with --postcode-column/--suburb-column/--distance-column"
            }
            MapError::BoundaryError { .. } => {
                "Make sure the boundary file is a GeoJSON FeatureCollection with postcode and suburb properties"
            }
            MapError::CsvError(_) => {
                "Make sure the pricing file is a comma-separated file with a header row"
            }
            MapError::IoError(_) => {
                "Check that the input files exist and the output directory is writable"
            }
            MapError::ZipError(_) => "Disable the bundle output or free up disk space",
            MapError::SerializationError(_) | MapError::RenderError { .. } => {
                "Re-run with --verbose to see which area could not be serialized"
            }
            MapError::ProcessingError { .. } => "Re-run with --verbose for details",
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => {
                "Review the configuration file or command-line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Input => format!("Could not read input data: {}", self),
            ErrorCategory::Processing => format!("Could not build the zone map: {}", self),
            ErrorCategory::Output => format!("Could not write output: {}", self),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
