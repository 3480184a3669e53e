use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Input is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Input contains no sales records")]
    EmptyDataset,

    #[error("Chart rendering failed: {message}")]
    ChartError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Processing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::CsvError(_)
            | AnalysisError::MissingColumn { .. }
            | AnalysisError::EmptyDataset => ErrorCategory::Input,
            AnalysisError::ConfigValidationError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalysisError::ProcessingError { .. } => ErrorCategory::Processing,
            AnalysisError::ZipError(_)
            | AnalysisError::SerializationError(_)
            | AnalysisError::ChartError { .. } => ErrorCategory::Output,
            AnalysisError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        // 空資料只代表沒有東西可分析
        if matches!(self, AnalysisError::EmptyDataset) {
            return ErrorSeverity::Medium;
        }

        match self.category() {
            ErrorCategory::System => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AnalysisError::CsvError(_) => {
                "Check that Qty and Amount columns contain only numbers or empty cells".to_string()
            }
            AnalysisError::MissingColumn { column } => format!(
                "Add a '{}' column to the CSV header (required: SKU, Qty, Amount)",
                column
            ),
            AnalysisError::EmptyDataset => {
                "Provide a CSV file with at least one sales row".to_string()
            }
            AnalysisError::IoError(_) => {
                "Verify the input file exists and the output directory is writable".to_string()
            }
            AnalysisError::ConfigValidationError { field, .. }
            | AnalysisError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
            AnalysisError::MissingConfigError { field } => {
                format!("Add the '{}' setting to your configuration", field)
            }
            AnalysisError::ChartError { .. } => {
                "Re-run with --no-charts or drop 'svg' from the output formats".to_string()
            }
            AnalysisError::ZipError(_) | AnalysisError::SerializationError(_) => {
                "Check free disk space in the output directory".to_string()
            }
            AnalysisError::ProcessingError { .. } => {
                "Re-run with --verbose to see which step failed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the sales data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Analysis failed: {}", self),
            ErrorCategory::Output => format!("Could not write the report: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    /// 依嚴重程度決定 CLI 的結束代碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
