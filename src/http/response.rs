use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use tokio::io::{self, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use super::{HeaderMapExt, WriteHeaders};

/// Response sink handed over by the transport.
pub trait ResponseSink: Send {
    fn status(&self) -> StatusCode;

    fn set_status(&mut self, status: StatusCode);

    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Terminal write. A sink is ended at most once.
    fn end(&mut self, body: Vec<u8>);
}

#[derive(Debug, Clone)]
pub struct ResponseParts {
    pub version: String,
    pub status: StatusCode,
    headers: HeaderMap,
    pub body: Vec<u8>,
    pub ended: bool,
}

impl Default for ResponseParts {
    fn default() -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            ended: false,
        }
    }
}

impl ResponseParts {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl HeaderMapExt for ResponseParts {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

/// In-memory sink. Clones share the same response, so the transport keeps
/// one handle while dispatch consumes the other.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    parts: Arc<Mutex<ResponseParts>>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResponseParts> {
        self.parts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_ended(&self) -> bool {
        self.lock().ended
    }

    /// Copy of the response as written so far.
    pub fn snapshot(&self) -> ResponseParts {
        self.lock().clone()
    }
}

impl ResponseSink for BufferedResponse {
    fn status(&self) -> StatusCode {
        self.lock().status
    }

    fn set_status(&mut self, status: StatusCode) {
        self.lock().status = status;
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.lock().headers.insert(name, value);
    }

    fn end(&mut self, body: Vec<u8>) {
        let mut parts = self.lock();
        if parts.ended {
            warn!("response already ended, dropping {} bytes", body.len());
            return;
        }
        parts.body = body;
        parts.ended = true;
    }
}

#[async_trait]
pub trait WriteResponse {
    async fn write_response(&mut self, response: &ResponseParts) -> io::Result<()>;
}

#[async_trait]
impl<W> WriteResponse for W
where
    W: AsyncWrite + ?Sized + Unpin + Send,
{
    async fn write_response(&mut self, response: &ResponseParts) -> io::Result<()> {
        let mut headers = response.headers.clone();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(response.body.len()));
        self.write_all(response.version.as_bytes()).await?;
        self.write_all(b" ").await?;
        self.write_all(response.status.as_str().as_bytes()).await?;
        self.write_all(b" ").await?;
        if let Some(reason) = response.status.canonical_reason() {
            self.write_all(reason.as_bytes()).await?;
        }
        self.write_all(b"\r\n").await?;
        self.write_headers(&headers).await?;
        self.write_all(b"\r\n").await?;
        self.write_all(&response.body).await?;
        self.flush().await?;
        Ok(())
    }
}
