//! HTTP server for the pi-chart monitoring pages.
//!
//! The server speaks a minimal HTTP/1.0: one request per connection, no
//! request bodies, `Connection: close` on every response. Connections are
//! served strictly one at a time by a single accept loop.

pub mod config;
pub mod connection;
pub mod request;
pub mod response;
pub mod router;

// Re-export commonly used items
pub use config::{ServerConfig, ServiceState};
pub use connection::handle_connection;
pub use request::{Method, Request};

use crate::error::{ChartError, Result};
use crate::template::SymbolProvider;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Pause after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// A bound listener together with everything needed to answer requests.
pub struct Server<P> {
    listener: TcpListener,
    config: ServerConfig,
    state: ServiceState,
    provider: P,
}

impl<P> Server<P>
where
    P: SymbolProvider + Send,
{
    /// Bind the listening socket described by `config`.
    pub async fn bind(config: ServerConfig, state: ServiceState, provider: P) -> Result<Self> {
        let addr = config
            .bind_address()
            .parse::<SocketAddr>()
            .map_err(|e| ChartError::config_error(format!("Invalid bind address: {}", e)))?;

        let socket = if addr.is_ipv6() {
            TcpSocket::new_v6()
        } else {
            TcpSocket::new_v4()
        }
        .map_err(|e| ChartError::web_server_error(format!("Unable to create socket: {}", e)))?;

        socket.set_reuseaddr(true).map_err(|e| {
            ChartError::web_server_error(format!("Setting SO_REUSEADDR failed: {}", e))
        })?;
        socket.bind(addr).map_err(|e| {
            ChartError::web_server_error(format!("Failed to bind to {}: {}", addr, e))
        })?;
        let listener = socket.listen(config.backlog).map_err(|e| {
            ChartError::web_server_error(format!("Failed to listen on {}: {}", addr, e))
        })?;

        Ok(Self {
            listener,
            config,
            state,
            provider,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections one after another until the service
    /// state is stopped. The flag is checked between connections only.
    pub async fn run(mut self) {
        info!(
            "Serving pages from {} on {}",
            self.config.directory.display(),
            self.config.bind_address()
        );

        while self.state.is_running() {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) =
                        handle_connection(stream, &self.config, &mut self.provider).await
                    {
                        warn!("Connection from {} failed: {}", peer, e);
                    }
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }

        info!("Server on {} stopped", self.config.bind_address());
    }
}

/// Start serving in a background task.
///
/// Returns `None` when serving is disabled (port 0) or the listener cannot
/// be set up; the failure is logged and the rest of the process keeps
/// running.
pub async fn start_server<P>(
    config: ServerConfig,
    state: ServiceState,
    provider: P,
) -> Option<JoinHandle<()>>
where
    P: SymbolProvider + Send + 'static,
{
    if !config.is_enabled() {
        info!("Server port is 0, not serving");
        return None;
    }

    let port = config.port;
    match Server::bind(config, state, provider).await {
        Ok(server) => {
            info!("Service has taken the stage on port {}", port);
            Some(tokio::spawn(server.run()))
        }
        Err(e) => {
            error!("Service was unable to take the stage on port {}: {}", port, e);
            None
        }
    }
}
