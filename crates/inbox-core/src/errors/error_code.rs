//! ErrorCode trait for the driver boundary.

/// Structured error code exposed to the training/evaluation driver.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "NOT_CONFIGURED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const NOT_CONFIGURED: &str = "NOT_CONFIGURED";
pub const INVALID_BIN_CONFIGURATION: &str = "INVALID_BIN_CONFIGURATION";
pub const EMPTY_VOCABULARY: &str = "EMPTY_VOCABULARY";
pub const CONFIGURATION_MISMATCH: &str = "CONFIGURATION_MISMATCH";
pub const CORRUPT_SNAPSHOT: &str = "CORRUPT_SNAPSHOT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
