//! Request line and header parsing.

use crate::parse::leading_integer;
use std::collections::HashMap;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Longest line kept in memory; further bytes up to the line break are dropped.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// HTTP request methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Trace,
    Connect,
    /// Anything not in the list above
    Invalid,
}

const METHODS: [(&[u8], Method); 8] = [
    (b"GET", Method::Get),
    (b"POST", Method::Post),
    (b"PUT", Method::Put),
    (b"DELETE", Method::Delete),
    (b"OPTIONS", Method::Options),
    (b"HEAD", Method::Head),
    (b"TRACE", Method::Trace),
    (b"CONNECT", Method::Connect),
];

impl Method {
    /// Case-insensitive prefix match of the request line against known methods.
    pub fn from_request_line(line: &[u8]) -> Self {
        METHODS
            .iter()
            .find(|(name, _)| {
                line.len() >= name.len() && line[..name.len()].eq_ignore_ascii_case(name)
            })
            .map(|&(_, method)| method)
            .unwrap_or(Method::Invalid)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
            Method::Invalid => "INVALID",
        }
    }
}

/// A parsed request. Only the request line and headers are read.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Raw path, query string removed, no percent-decoding.
    pub path: Vec<u8>,
    /// Header values keyed by lower-cased name; the last duplicate wins.
    pub headers: HashMap<String, String>,
    /// Declared body length, 0 when absent or malformed.
    pub content_length: usize,
}

impl Request {
    /// Read the request line and header block from `reader`.
    pub async fn read_from<R>(reader: &mut R) -> io::Result<Self>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut line = Vec::with_capacity(1024);
        read_line(reader, &mut line).await?;

        let method = Method::from_request_line(&line);
        let path = parse_path(&line);

        let mut headers = HashMap::with_capacity(32);
        let content_length = read_headers(reader, &mut headers).await?;

        Ok(Self {
            method,
            path,
            headers,
            content_length,
        })
    }

    /// Look up a header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

async fn peek_byte<R>(reader: &mut R) -> io::Result<Option<u8>>
where
    R: AsyncBufRead + Unpin,
{
    Ok(reader.fill_buf().await?.first().copied())
}

async fn next_byte<R>(reader: &mut R) -> io::Result<Option<u8>>
where
    R: AsyncBufRead + Unpin,
{
    let byte = peek_byte(reader).await?;
    if byte.is_some() {
        reader.consume(1);
    }
    Ok(byte)
}

/// Read one line into `line`, replacing its contents.
///
/// `\r\n`, a bare `\r` and a bare `\n` all end the line and are stored as a
/// single `\n`. Returns the stored length; 0 means the peer sent nothing
/// before closing.
pub async fn read_line<R>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();

    while let Some(mut byte) = next_byte(reader).await? {
        if byte == b'\r' {
            if peek_byte(reader).await? == Some(b'\n') {
                reader.consume(1);
            }
            byte = b'\n';
        }

        if line.len() < MAX_LINE_LENGTH || byte == b'\n' {
            line.push(byte);
        }

        if byte == b'\n' {
            break;
        }
    }

    Ok(line.len())
}

/// Extract the path from a request line.
///
/// The method token and the blanks after it are skipped; the path ends at
/// `?`, a blank, or the end of the line.
pub fn parse_path(line: &[u8]) -> Vec<u8> {
    let is_blank = |b: &u8| *b == b' ' || *b == b'\t';

    let after_method = line
        .iter()
        .position(is_blank)
        .map_or(&[][..], |index| &line[index..]);
    let start = after_method
        .iter()
        .position(|b| !is_blank(b))
        .unwrap_or(after_method.len());

    after_method[start..]
        .iter()
        .take_while(|&&b| !matches!(b, b'?' | b' ' | b'\t' | b'\r' | b'\n'))
        .copied()
        .collect()
}

/// Trim a header field: cut at the last `\n`, then at the last `\r`, then
/// drop one leading space.
fn clean_field(field: &[u8]) -> &[u8] {
    let mut field = field;
    if let Some(index) = field.iter().rposition(|&b| b == b'\n') {
        field = &field[..index];
    }
    if let Some(index) = field.iter().rposition(|&b| b == b'\r') {
        field = &field[..index];
    }
    field.strip_prefix(b" ").unwrap_or(field)
}

/// Split a header line at its first `:` into cleaned key and value.
fn split_header(line: &[u8]) -> (&[u8], &[u8]) {
    let (key, value) = match line.iter().position(|&b| b == b':') {
        Some(index) => (&line[..index], &line[index + 1..]),
        None => (line, &[][..]),
    };
    (clean_field(key), clean_field(value))
}

/// Read header lines into `headers` until the blank line or end of input.
///
/// Returns the declared `Content-Length`, or 0.
pub async fn read_headers<R>(
    reader: &mut R,
    headers: &mut HashMap<String, String>,
) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length = 0;
    let mut line = Vec::with_capacity(256);

    while read_line(reader, &mut line).await? > 0 {
        let (key, value) = split_header(&line);

        if key.is_empty() {
            break;
        }

        if !value.is_empty() {
            headers.insert(
                String::from_utf8_lossy(key).to_ascii_lowercase(),
                String::from_utf8_lossy(value).into_owned(),
            );
        }

        if key == b"Content-Length" {
            content_length = usize::try_from(leading_integer(value)).unwrap_or(0);
        }
    }

    Ok(content_length)
}
