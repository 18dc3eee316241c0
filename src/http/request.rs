use std::fmt;

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};

use super::{body, BodyStream, HeaderMapExt, ReadHeaders};
use crate::io::error::{error, RequestLine};

/// Request descriptor handed over by the transport.
///
/// `target` is the raw request target (path plus optional query) and is the
/// only field rewritten while a request is delegated to mounted routers.
pub struct RawRequest {
    pub method: Method,
    pub target: String,
    pub version: String,
    headers: HeaderMap,
    body: BodyStream,
    pub(crate) mount_path: String,
}

impl RawRequest {
    pub fn new<T: Into<String>>(method: Method, target: T) -> Self {
        Self {
            method,
            target: target.into(),
            version: "HTTP/1.1".to_string(),
            headers: HeaderMap::new(),
            body: body::empty(),
            mount_path: String::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: BodyStream) -> Self {
        self.body = body;
        self
    }

    /// Prefixes stripped by parent routers, concatenated in walk order.
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    /// Strip `prefix` from the target and remember it as walked.
    pub(crate) fn delegate(&mut self, prefix: &str) {
        let rest = self.target.get(prefix.len()..).unwrap_or_default();
        self.target = if rest.is_empty() {
            "/".to_string()
        } else if rest.starts_with('?') {
            format!("/{rest}")
        } else {
            rest.to_string()
        };
        self.mount_path.push_str(prefix);
    }

    pub(crate) fn into_parts(self) -> (Method, String, HeaderMap, BodyStream) {
        (self.method, self.target, self.headers, self.body)
    }
}

impl HeaderMapExt for RawRequest {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl fmt::Debug for RawRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRequest")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("mount_path", &self.mount_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait ReadRequest {
    /// Parse the request line and headers. The returned request has an empty body.
    async fn read_request(&mut self) -> io::Result<RawRequest>;
}

#[async_trait]
impl<R> ReadRequest for R
where
    R: AsyncBufRead + ?Sized + Unpin + Send,
{
    async fn read_request(&mut self) -> io::Result<RawRequest> {
        let mut request_line = String::new();
        if self.read_line(&mut request_line).await? == 0 {
            return Err(error(RequestLine::MissingRequestLine));
        }
        let (method, target, version) = {
            let mut parts = request_line.split_whitespace();
            (
                parts
                    .next()
                    .ok_or(error(RequestLine::MissingMethod))?
                    .to_ascii_uppercase()
                    .parse::<Method>()
                    .map_err(|_| error(RequestLine::InvalidMethod))?,
                parts
                    .next()
                    .ok_or(error(RequestLine::MissingTarget))?
                    .to_string(),
                parts
                    .next()
                    .ok_or(error(RequestLine::MissingVersion))?
                    .to_string(),
            )
        };
        let mut request = RawRequest::new(method, target);
        request.version = version;
        request.headers = self.read_headers().await?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use http::header;
    use pretty_assertions::assert_eq;
    use tokio::io::BufReader;

    use super::*;

    #[tokio::test]
    async fn parses_request_head() {
        let mut reader = BufReader::new(
            &b"POST /test/123?query=1 HTTP/1.1\r\nHost: localhost\r\nContent-Length: 2\r\n\r\n{}"[..],
        );
        let request = reader.read_request().await.unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.target, "/test/123?query=1");
        assert_eq!(request.version, "HTTP/1.1");
        assert_eq!(request.header(header::HOST).unwrap(), "localhost");
        assert_eq!(request.get_content_length(), Some(2));
    }

    #[tokio::test]
    async fn normalizes_method_case() {
        let mut reader = BufReader::new(&b"get /test/1 HTTP/1.1\r\n\r\n"[..]);
        let request = reader.read_request().await.unwrap();
        assert_eq!(request.method, Method::GET);
    }

    #[tokio::test]
    async fn rejects_missing_target() {
        let mut reader = BufReader::new(&b"GET\r\n\r\n"[..]);
        let error = reader.read_request().await.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn delegate_strips_prefix() {
        let mut request = RawRequest::new(Method::GET, "/api/users/42");
        request.delegate("/api");
        assert_eq!(request.target, "/users/42");
        assert_eq!(request.mount_path(), "/api");
    }

    #[test]
    fn delegate_replaces_empty_remainder() {
        let mut request = RawRequest::new(Method::GET, "/api");
        request.delegate("/api");
        assert_eq!(request.target, "/");

        let mut request = RawRequest::new(Method::GET, "/api?page=2");
        request.delegate("/api");
        assert_eq!(request.target, "/?page=2");
    }
}
