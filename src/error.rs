//! Error handling for the pi-chart monitoring server.

use crate::template::TemplateError;

/// A specialized `Result` type for pi-chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// The main error type for pi-chart operations.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Template expansion was refused
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// GPIO operation failed
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// Sensor communication failed
    #[error("Sensor error: {0}")]
    Sensor(String),
}

impl ChartError {
    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new GPIO error
    pub fn gpio_error(msg: impl Into<String>) -> Self {
        Self::Gpio(msg.into())
    }

    /// Create a new sensor error
    pub fn sensor_error(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_conversion() {
        let err: ChartError = TemplateError::InvalidInput.into();
        assert!(matches!(err, ChartError::Template(TemplateError::InvalidInput)));
        assert!(err.to_string().contains("invalid input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.html");
        let err: ChartError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
