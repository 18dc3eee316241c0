use http::{header, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::{http::ResponseSink, Result};

const TEXT_PLAIN: &str = "text/plain";
const APPLICATION_JSON: &str = "application/json";

/// Data accepted by [`Response::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Objects, arrays and `null` are JSON; strings, numbers and booleans are text.
impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Number(_) | Value::Bool(_) => Self::Text(value.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Json(value),
        }
    }
}

/// Chainable view over the transport's response sink.
///
/// Terminal operations take `self`, so a response is ended at most once.
pub struct Response {
    sink: Box<dyn ResponseSink>,
}

impl Response {
    pub fn new<S: ResponseSink + 'static>(sink: S) -> Self {
        Self::from_boxed(Box::new(sink))
    }

    pub(crate) fn from_boxed(sink: Box<dyn ResponseSink>) -> Self {
        Self { sink }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.sink.set_status(status);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.sink.status()
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.sink.set_header(name, value);
        self
    }

    /// Text is written as `text/plain`, JSON values as `application/json`.
    pub fn send<P: Into<Payload>>(self, data: P) -> Result<()> {
        match data.into() {
            Payload::Text(text) => {
                self.finish(TEXT_PLAIN, text.into_bytes());
                Ok(())
            }
            Payload::Json(value) => self.json(&value),
        }
    }

    pub fn json<T: Serialize + ?Sized>(self, data: &T) -> Result<()> {
        let body = serde_json::to_vec(data)?;
        self.finish(APPLICATION_JSON, body);
        Ok(())
    }

    /// End the response without a body.
    pub fn end(mut self) {
        self.sink.end(Vec::new());
    }

    pub(crate) fn not_found(mut self) {
        self.sink.set_status(StatusCode::NOT_FOUND);
        self.sink.end(b"Not Found".to_vec());
    }

    fn finish(mut self, content_type: &'static str, body: Vec<u8>) {
        self.sink
            .set_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.sink.end(body);
    }
}
