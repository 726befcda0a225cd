use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

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

    #[error("Bad input: '{path}' is a directory")]
    BadInput { path: String },

    #[error("Row {row} has {found} fields, expected at least {expected}")]
    MissingColumn {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定程序退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PlotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlotError::ConfigError { .. }
            | PlotError::ConfigValidationError { .. }
            | PlotError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PlotError::CsvError(_) | PlotError::BadInput { .. } | PlotError::MissingColumn { .. } => {
                ErrorCategory::Input
            }
            PlotError::ImageError(_) | PlotError::RenderError { .. } => ErrorCategory::Rendering,
            PlotError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PlotError::ConfigError { .. }
            | PlotError::ConfigValidationError { .. }
            | PlotError::InvalidConfigValueError { .. }
            | PlotError::BadInput { .. } => ErrorSeverity::Medium,
            PlotError::CsvError(_) | PlotError::MissingColumn { .. } => ErrorSeverity::High,
            PlotError::RenderError { .. } => ErrorSeverity::High,
            PlotError::IoError(_) | PlotError::ImageError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PlotError::IoError(_) => "Check that the input file exists and the output directory is writable",
            PlotError::CsvError(_) => "Make sure the input is a valid comma-separated file",
            PlotError::ImageError(_) => "Check free disk space and permissions of the output directory",
            PlotError::ConfigError { .. } | PlotError::ConfigValidationError { .. } => {
                "Fix the configuration file and run again"
            }
            PlotError::InvalidConfigValueError { .. } => "Correct the highlighted option and run again",
            PlotError::BadInput { .. } => "Pass a CSV file, not a directory, to --file",
            PlotError::MissingColumn { .. } => {
                "Every row needs the origin and destination columns; check the delimiter and column settings"
            }
            PlotError::RenderError { .. } => "Use a non-zero image width and height",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlotError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", e)
            }
            PlotError::IoError(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                "Permission denied".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_exit_codes() {
        let err = PlotError::BadInput {
            path: "data".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity().exit_code(), 2);

        let err = PlotError::MissingColumn {
            row: 3,
            expected: 13,
            found: 4,
        };
        assert_eq!(err.severity().exit_code(), 1);
        assert_eq!(err.to_string(), "Row 3 has 4 fields, expected at least 13");

        let err = PlotError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity().exit_code(), 3);
        assert_eq!(err.user_friendly_message(), "File not found: gone");

        let err = PlotError::ConfigError {
            message: "Cannot read config file 'map.toml': missing".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().contains("map.toml"));
    }
}
