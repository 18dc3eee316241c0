use anyhow::Result;
use std::{
    future::Future,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tracing::{debug, info};

use super::handler::{RouterHandler, DEFAULT_MAX_BODY_SIZE};
use crate::{http::server::Server as HttpServer, Router};

/// A builder for a server.
pub struct ServerBuilder {
    router: Arc<Router>,
    host: IpAddr,
    port: u16,
    max_body_size: usize,
}

impl ServerBuilder {
    fn new(router: Arc<Router>) -> Self {
        Self {
            router,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 80,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Set the host to listen on.
    /// The default host is 127.0.0.1
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Set the port to listen on. Port 0 picks a free port.
    /// The default port is 80
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Requests declaring a larger `Content-Length` are answered with 413.
    /// The default limit is 1 MiB
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Bind the listener.
    pub async fn build(self) -> Result<Server> {
        let app = HttpServer::bind(
            SocketAddr::new(self.host, self.port),
            RouterHandler::new(self.router, self.max_body_size),
        )
        .await?;
        Ok(Server { app })
    }
}

pub struct Server {
    app: HttpServer<RouterHandler>,
}

impl Server {
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.app.local_addr()
    }

    /// Serve until the accept loop fails.
    pub async fn run(self) -> Result<()> {
        info!(addr = ?self.app.local_addr().ok(), "Starting server");
        self.app.run().await
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run() => result,
            _ = shutdown => {
                debug!("Server stopped");
                Ok(())
            }
        }
    }
}

/// Create a new server builder serving `router`.
pub fn builder(router: impl Into<Arc<Router>>) -> ServerBuilder {
    ServerBuilder::new(router.into())
}
