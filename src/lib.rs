//! # pi-chart - Raspberry Pi Monitoring Server
//!
//! A small embedded HTTP server for Raspberry Pi monitoring. Requests are
//! answered from two fixed diagnostic endpoints or from HTML documents on
//! disk, which are expanded by a tiny template interpreter before they are
//! sent.
//!
//! ## Features
//!
//! - **Diagnostic endpoints**: `/health` and `/buildInfo` JSON
//! - **Template pages**: `<%= symbol %>` output and `If`/`Else`/`EndIf` blocks
//! - **Sensor symbols**: GPIO pins, AM2315 temperature/humidity, memory and
//!   process information
//! - **Emulation**: runs on any machine; real GPIO and I2C behind the `gpio`
//!   feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pi_chart::{start_server, SensorSymbols, ServerConfig, ServiceState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default().with_directory("/var/www/pi-chart");
//!     let state = ServiceState::new();
//!
//!     if let Some(server) = start_server(config, state, SensorSymbols::new()).await {
//!         let _ = server.await;
//!     }
//! }
//! ```

pub mod error;
pub mod metrics;
mod parse;
pub mod template;
pub mod web;

// Re-export public API
pub use error::{ChartError, Result};
pub use metrics::{GpioProvider, PinLevel, SensorSymbols};
pub use template::{generate_output, render, StaticSymbols, SymbolProvider, TemplateError};
pub use web::{handle_connection, start_server, Server, ServerConfig, ServiceState};

/// Version reported in the `Server` header and by `/buildInfo`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by `/buildInfo`.
pub const SERVICE_NAME: &str = "pi-chart";

/// The default server port
pub const DEFAULT_PORT: u16 = 8090;

/// The default template document directory
pub const DEFAULT_DIRECTORY: &str = ".";

/// The default pending-connection backlog
pub const DEFAULT_BACKLOG: u32 = 5;
