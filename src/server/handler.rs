use async_trait::async_trait;
use http::{header, HeaderValue, StatusCode};
use std::sync::Arc;
use tokio::{
    io::{self, AsyncBufRead, AsyncWriteExt, BufReader},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
};
use tracing::{debug, error, info, warn};

use crate::{
    http::{
        body, server::ConnectionHandler, BufferedResponse, HeaderMapExt, RawRequest, ReadRequest,
        ResponseParts, ResponseSink, WriteResponse,
    },
    io::error::{error as protocol_error, ProtocolError},
    Router,
};

/// Largest request body accepted unless configured otherwise: 1 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Serves one request per connection through a [`Router`].
pub struct RouterHandler {
    router: Arc<Router>,
    max_body_size: usize,
}

impl RouterHandler {
    pub fn new(router: Arc<Router>, max_body_size: usize) -> Self {
        Self {
            router,
            max_body_size,
        }
    }

    async fn serve(&self, rx: OwnedReadHalf, tx: &mut OwnedWriteHalf) -> io::Result<()> {
        let request = match read_head(BufReader::new(rx), self.max_body_size).await {
            Ok(request) => request,
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                write_status(tx, rejection_status(&err)).await?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        let method = request.method.clone();
        let target = request.target.clone();
        debug!(method = %method, target = %target, "Parsed request");

        let sink = BufferedResponse::new();
        if let Err(err) = self.router.handle_request(request, sink.clone()).await {
            error!(method = %method, target = %target, "Request failed: {}", err);
            if !sink.is_ended() {
                let mut fault = sink.clone();
                fault.set_status(StatusCode::INTERNAL_SERVER_ERROR);
                fault.end(Vec::new());
            }
        }
        let mut response = sink.snapshot();
        response.insert_header(header::CONNECTION, HeaderValue::from_static("close"));
        tx.write_response(&response).await?;
        info!(method = %method, target = %target, status = response.status.as_u16(), "Request served");
        tx.shutdown().await
    }
}

async fn read_head<R>(mut reader: R, max_body_size: usize) -> io::Result<RawRequest>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let request = reader.read_request().await?;
    let length = match request.header(header::CONTENT_LENGTH) {
        None => 0,
        Some(_) => request
            .get_content_length()
            .ok_or_else(|| protocol_error(ProtocolError::ContentLength))?,
    };
    if length > max_body_size {
        return Err(protocol_error(ProtocolError::PayloadTooLarge {
            length,
            limit: max_body_size,
        }));
    }
    Ok(request.with_body(body::with_length(reader, length)))
}

fn rejection_status(err: &io::Error) -> StatusCode {
    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<ProtocolError>())
    {
        Some(ProtocolError::PayloadTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

async fn write_status(tx: &mut OwnedWriteHalf, status: StatusCode) -> io::Result<()> {
    let mut response = ResponseParts::new(status);
    response.insert_header(header::CONNECTION, HeaderValue::from_static("close"));
    tx.write_response(&response).await
}

#[async_trait]
impl ConnectionHandler for RouterHandler {
    async fn handle(&self, stream: TcpStream) {
        let ip = stream.peer_addr().ok();
        let (rx, mut tx) = stream.into_split();
        match self.serve(rx, &mut tx).await {
            Ok(()) => debug!(ip = ?ip, "Connection closed"),
            Err(err) => warn!(ip = ?ip, "Failed to serve connection: {}", err),
        }
    }
}
