use thiserror::Error;
use tokio::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),
    #[error("request body was already consumed")]
    BodyConsumed,
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn new<S: AsRef<str>>(message: S) -> Self {
        Self::Message(message.as_ref().to_string())
    }

    /// Returns true if the error originated from the underlying connection.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
