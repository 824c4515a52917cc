//! Maps request paths to diagnostic endpoints or template documents.

use crate::template::{generate_output, SymbolProvider};
use crate::web::config::ServerConfig;
use crate::web::request::{Method, Request};
use crate::web::response;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Characters removed from a path before it is used as a file name.
const STRIPPED_PATH_BYTES: [u8; 4] = [b'.', b'\\', b'?', b'!'];

/// Build the full response for `request`.
///
/// Anything but GET receives the 404 document.
pub async fn route<P>(request: &Request, config: &ServerConfig, provider: &mut P) -> Vec<u8>
where
    P: SymbolProvider + Send + ?Sized,
{
    if request.method != Method::Get {
        return response::not_found();
    }

    let path = request.path.as_slice();
    if path.starts_with(b"/health") {
        response::health_check()
    } else if path.starts_with(b"/buildInfo") {
        response::build_info()
    } else {
        monitor_page(path, config, provider)
            .await
            .unwrap_or_else(response::not_found)
    }
}

/// Remove `.`, `\`, `?` and `!` anywhere in the path.
pub fn sanitize_path(path: &[u8]) -> Vec<u8> {
    path.iter()
        .copied()
        .filter(|b| !STRIPPED_PATH_BYTES.contains(b))
        .collect()
}

/// File backing a request path: `<directory><clean path>.html`, with `/`
/// served from `index`.
pub fn document_path(directory: &Path, request_path: &[u8]) -> PathBuf {
    let mut clean = sanitize_path(request_path);
    if clean == b"/" {
        clean.extend_from_slice(b"index");
    }

    let mut file = OsString::from(directory.as_os_str());
    file.push(String::from_utf8_lossy(&clean).as_ref());
    file.push(".html");
    PathBuf::from(file)
}

/// Load and expand the template document for `path`.
///
/// Returns `None` when the document cannot be read or expanded.
async fn monitor_page<P>(path: &[u8], config: &ServerConfig, provider: &mut P) -> Option<Vec<u8>>
where
    P: SymbolProvider + Send + ?Sized,
{
    let file = document_path(&config.directory, path);

    let document = match tokio::fs::read(&file).await {
        Ok(document) => document,
        Err(e) => {
            debug!("Cannot load template {}: {}", file.display(), e);
            return None;
        }
    };

    let mut body = Vec::with_capacity(document.len() + 1);
    if let Err(e) = generate_output(&document, &mut body, provider) {
        warn!("Cannot expand template {}: {}", file.display(), e);
        return None;
    }

    Some(response::html_page(&body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path(b"/../secret"), b"//secret");
        assert_eq!(sanitize_path(b"/a.b\\c?d!e"), b"/abcde");
        assert_eq!(sanitize_path(b"/plain"), b"/plain");
    }

    #[test]
    fn test_document_path() {
        let root = Path::new("/srv/pages");
        assert_eq!(
            document_path(root, b"/"),
            PathBuf::from("/srv/pages/index.html")
        );
        assert_eq!(
            document_path(root, b"/status"),
            PathBuf::from("/srv/pages/status.html")
        );
        assert_eq!(
            document_path(root, b"/../../etc/passwd"),
            PathBuf::from("/srv/pages////etc/passwd.html")
        );
        assert_eq!(
            document_path(Path::new("."), b"/"),
            PathBuf::from("./index.html")
        );
    }
}
