//! Minimal HTTP request router.
//!
//! Routes are `(method, pattern, handler)` bindings where a pattern segment is
//! either a literal or a `:name` parameter. Routers can be mounted under a
//! path prefix; dispatch walks mounts first, then routes, first match wins.
//!
//! # Example usage
//!
//! ```
//! use serde_json::json;
//! use switchboard::{
//!     http::{BufferedResponse, RawRequest},
//!     Request, Response, RouteBuilder, Router,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let users = RouteBuilder::new()
//!     .get("/users/:id", |request: Request, response: Response| async move {
//!         response.json(&json!({ "id": request.param("id") }))
//!     })
//!     .build()
//!     .unwrap();
//! let router = Router::nest("/api", users);
//!
//! let sink = BufferedResponse::new();
//! router
//!     .handle_request(RawRequest::new(::http::Method::GET, "/api/users/42"), sink.clone())
//!     .await
//!     .unwrap();
//! assert_eq!(sink.snapshot().body_string(), r#"{"id":"42"}"#);
//! # });
//! ```
pub mod error;
pub mod handler;
pub mod http;
pub(crate) mod io;
pub mod logging;
pub mod router;
pub mod server;

pub use error::{Error, Result};
pub use handler::{Body, Handler, Params, Payload, Request, Response};
pub use router::{Route, RouteBuilder, RouteTable, Router};
pub use server::{builder, Server, ServerBuilder};
