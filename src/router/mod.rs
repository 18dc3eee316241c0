//! Route matching and dispatch.
//!
//! ```text
//! RawRequest + ResponseSink
//!     → Router: mounted prefixes, in insertion order (strip prefix, recurse)
//!     → Router: route table, in registration order (first match wins)
//!     → Handler(Request with params, Response)
//!     → or 404 "Not Found"
//! ```

mod builder;
mod route;
#[allow(clippy::module_inception)]
mod router;
mod table;

pub use builder::RouteBuilder;
pub use route::{parse_method, Route};
pub use router::Router;
pub use table::RouteTable;
