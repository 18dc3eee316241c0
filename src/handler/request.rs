use std::{collections::HashMap, mem};

use futures::StreamExt;
use http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use crate::{
    http::{BodyStream, RawRequest},
    Error, Result,
};

/// Path parameters by name. Values are the raw segment text.
pub type Params = HashMap<String, String>;

/// Parsed request body: JSON when the bytes are valid JSON, text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    pub fn parse(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Deserialize a JSON body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Json(value) => Ok(T::deserialize(value)?),
            Self::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

enum BodyState {
    Unread(BodyStream),
    Parsed(Body),
    Consumed,
}

/// One incoming request as seen by a handler.
pub struct Request {
    method: Method,
    url: String,
    path: String,
    headers: HeaderMap,
    pub params: Params,
    route_path: Option<String>,
    body: BodyState,
}

impl Request {
    pub fn new(raw: RawRequest) -> Self {
        let (method, url, headers, body) = raw.into_parts();
        Self {
            path: path_of(&url),
            method,
            url,
            headers,
            params: Params::new(),
            route_path: None,
            body: BodyState::Unread(body),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw request target, query string included.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the target, without query string or fragment.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Decoded query-string pairs in the order they appear.
    pub fn query(&self) -> Vec<(String, String)> {
        let query = self
            .url
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or_default();
        let query = query.split('#').next().unwrap_or_default();
        form_urlencoded::parse(query.as_bytes()).into_owned().collect()
    }

    /// Mount prefixes walked during dispatch followed by the matched pattern.
    pub fn route_path(&self) -> Option<&str> {
        self.route_path.as_deref()
    }

    pub(crate) fn set_route_path(&mut self, route_path: String) {
        self.route_path = Some(route_path);
    }

    /// Read and parse the body.
    ///
    /// The transport stream is consumed on the first call; later calls return
    /// the cached value. If reading fails the error is returned once and every
    /// later call fails with [`Error::BodyConsumed`].
    pub async fn body(&mut self) -> Result<&Body> {
        match mem::replace(&mut self.body, BodyState::Consumed) {
            BodyState::Unread(stream) => {
                let bytes = read_all(stream).await?;
                self.body = BodyState::Parsed(Body::parse(&bytes));
            }
            state => self.body = state,
        }
        match &self.body {
            BodyState::Parsed(body) => Ok(body),
            _ => Err(Error::BodyConsumed),
        }
    }
}

async fn read_all(mut stream: BodyStream) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = stream.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(bytes)
}

fn path_of(target: &str) -> String {
    match target.parse::<Uri>() {
        Ok(uri) => uri.path().to_string(),
        Err(_) => target
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
