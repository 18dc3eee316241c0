use async_trait::async_trait;
use http::{header, HeaderMap, HeaderName, HeaderValue};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::io::error::{error, Headers};

/// Shared header accessors for anything that owns a [`HeaderMap`].
pub trait HeaderMapExt {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn header<K: header::AsHeaderName>(&self, key: K) -> Option<&HeaderValue> {
        self.headers().get(key)
    }

    fn insert_header<K, V>(&mut self, key: K, value: V) -> Option<HeaderValue>
    where
        K: header::IntoHeaderName,
        V: Into<HeaderValue>,
    {
        self.headers_mut().insert(key, value.into())
    }

    fn get_content_length(&self) -> Option<usize> {
        self.header(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }
}

#[async_trait]
pub trait WriteHeaders {
    async fn write_headers(&mut self, headers: &HeaderMap) -> io::Result<()>;
}

#[async_trait]
impl<W> WriteHeaders for W
where
    W: AsyncWrite + ?Sized + Unpin + Send,
{
    async fn write_headers(&mut self, headers: &HeaderMap) -> io::Result<()> {
        for (key, value) in headers {
            self.write_all(key.as_str().as_bytes()).await?;
            self.write_all(b": ").await?;
            self.write_all(value.as_bytes()).await?;
            self.write_all(b"\r\n").await?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait ReadHeaders {
    /// Read header lines up to and including the blank line that ends the head.
    async fn read_headers(&mut self) -> io::Result<HeaderMap>;
}

#[async_trait]
impl<R> ReadHeaders for R
where
    R: AsyncBufRead + ?Sized + Unpin + Send,
{
    async fn read_headers(&mut self) -> io::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        loop {
            let mut line = String::new();
            if self.read_line(&mut line).await? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed inside request head",
                ));
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                break;
            }
            let (key, value) = line
                .split_once(':')
                .ok_or(error(Headers::MissingSeparator))?;
            headers.append(
                HeaderName::from_bytes(key.trim().as_bytes())
                    .map_err(Headers::InvalidName)
                    .map_err(error)?,
                HeaderValue::from_str(value.trim())
                    .map_err(Headers::InvalidValue)
                    .map_err(error)?,
            );
        }
        Ok(headers)
    }
}
