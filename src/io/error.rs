use http::header::{InvalidHeaderName, InvalidHeaderValue};
use thiserror::Error;
use tokio::io;

/// Wrap a framing problem into an `io::Error` so parsers can keep returning `io::Result`.
pub fn error<E: Into<ProtocolError>>(data: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, data.into())
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed request line: {0:?}")]
    RequestLine(RequestLine),
    #[error("malformed header: {0:?}")]
    Headers(Headers),
    #[error("invalid content length")]
    ContentLength,
    #[error("body of {length} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { length: usize, limit: usize },
}

#[derive(Debug)]
pub enum RequestLine {
    MissingRequestLine,
    MissingMethod,
    MissingTarget,
    MissingVersion,
    InvalidMethod,
}

impl From<RequestLine> for ProtocolError {
    fn from(value: RequestLine) -> Self {
        ProtocolError::RequestLine(value)
    }
}

#[derive(Debug)]
pub enum Headers {
    MissingSeparator,
    InvalidName(InvalidHeaderName),
    InvalidValue(InvalidHeaderValue),
}

impl From<Headers> for ProtocolError {
    fn from(value: Headers) -> Self {
        ProtocolError::Headers(value)
    }
}
