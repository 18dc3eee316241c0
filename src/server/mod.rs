pub mod app;
mod handler;

pub use app::{builder, Server, ServerBuilder};
pub use handler::RouterHandler;
