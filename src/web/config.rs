//! Server configuration and run state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Configuration for the monitoring server.
///
/// Built once at startup and shared read-only with the accept loop and the
/// router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind the server to
    pub host: String,
    /// Port to bind the server to; 0 disables serving
    pub port: u16,
    /// Directory template documents are read from
    pub directory: PathBuf,
    /// Maximum length of the pending-connection queue
    pub backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_PORT,
            directory: PathBuf::from(crate::DEFAULT_DIRECTORY),
            backlog: crate::DEFAULT_BACKLOG,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration with custom host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the host for the server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port for the server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the template document directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the pending-connection backlog.
    pub fn with_backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Whether a listener should be started at all.
    pub fn is_enabled(&self) -> bool {
        self.port != 0
    }

    /// Get the full bind address.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Shared "keep serving" flag.
///
/// The accept loop checks it once per iteration, so a stop request takes
/// effect between connections.
#[derive(Debug, Clone)]
pub struct ServiceState {
    running: Arc<AtomicBool>,
}

impl ServiceState {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8090);
        assert_eq!(config.directory, PathBuf::from("."));
        assert_eq!(config.backlog, 5);
        assert!(config.is_enabled());
        assert!(!config.with_port(0).is_enabled());
    }

    #[test]
    fn test_ipv6_bind_address() {
        let config = ServerConfig::new("::", 8090);
        assert_eq!(config.bind_address(), "[::]:8090");
        assert!(config.bind_address().parse::<std::net::SocketAddr>().is_ok());
    }

    #[test]
    fn test_service_state_is_shared() {
        let state = ServiceState::new();
        let handle = state.clone();
        assert!(handle.is_running());
        state.stop();
        assert!(!handle.is_running());
    }
}
