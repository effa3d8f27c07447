use thiserror::Error;

/// Application-level error carrying the process exit code.
///
/// Exit codes:
/// - `2`: bad input, schema or configuration
/// - `3`: nothing usable remains after processing
/// - `4`: output / IO failure
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Input that cannot be interpreted as a tabular dataset at all.
///
/// A valid-but-empty dataset is *not* an error: it flows through to the
/// quality report as a structural finding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// The payload is not a sequence of rows (e.g. a JSON object or scalar).
    #[error("Bad input shape: expected an array of row objects, found {found}")]
    NotTabular { found: &'static str },

    /// The header line could not be read.
    #[error("Failed to read CSV headers: {0}")]
    Header(String),

    /// The header is present but unusable (blank or duplicated names).
    #[error("Invalid CSV header: {0}")]
    InvalidHeader(String),
}

impl From<DatasetError> for AppError {
    fn from(value: DatasetError) -> Self {
        AppError::new(2, value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_error_maps_to_input_exit_code() {
        let err: AppError = DatasetError::NotTabular { found: "object" }.into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Bad input shape: expected an array of row objects, found object"
        );
    }

    #[test]
    fn app_error_debug_includes_exit_code() {
        let err = AppError::new(4, "disk full");
        let debug = format!("{err:?}");
        assert!(debug.contains("exit_code: 4"));
        assert!(debug.contains("disk full"));
    }
}
