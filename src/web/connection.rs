//! One request/response exchange on an accepted connection.

use crate::template::SymbolProvider;
use crate::web::config::ServerConfig;
use crate::web::request::Request;
use crate::web::router;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

/// Serve a single request on `stream` and close it.
///
/// The request line and headers are read, the response is built in full and
/// handed to the socket with a single write. A short write is logged, not
/// retried. There is no timeout: a silent peer holds the caller until it
/// disconnects.
pub async fn handle_connection<S, P>(
    stream: S,
    config: &ServerConfig,
    provider: &mut P,
) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    P: SymbolProvider + Send + ?Sized,
{
    let mut stream = BufReader::new(stream);

    let request = Request::read_from(&mut stream).await?;
    debug!(
        method = request.method.as_str(),
        path = %String::from_utf8_lossy(&request.path),
        "Handling request"
    );

    let response = router::route(&request, config, provider).await;

    if !response.is_empty() {
        let written = stream.write(&response).await?;
        if written < response.len() {
            warn!(
                "Short write: sent {} of {} response bytes",
                written,
                response.len()
            );
        }
    }

    stream.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::StaticSymbols;

    #[tokio::test]
    async fn test_health_exchange() {
        let expected = format!(
            "HTTP/1.0 200 OK\r\n\
             Server: {}\r\n\
             Transfer-Encoding: Identity\r\n\
             Content-Type: application/json;charset=UTF-8\r\n\
             Connection: close\r\n\
             Content-Length: 15\r\n\
             \r\n\
             {{\"status\":\"UP\"}}",
            crate::VERSION
        );

        let stream = tokio_test::io::Builder::new()
            .read(b"GET /health HTTP/1.0\r\n\r\n")
            .write(expected.as_bytes())
            .build();

        let config = ServerConfig::default();
        let mut symbols = StaticSymbols::new();
        handle_connection(stream, &config, &mut symbols)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_get_is_not_found() {
        let stream = tokio_test::io::Builder::new()
            .read(b"POST /health HTTP/1.0\r\nContent-Length: 0\r\n\r\n")
            .write(&crate::web::response::not_found())
            .build();

        let config = ServerConfig::default();
        let mut symbols = StaticSymbols::new();
        handle_connection(stream, &config, &mut symbols)
            .await
            .unwrap();
    }
}
