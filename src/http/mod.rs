pub mod body;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use body::BodyStream;
pub use headers::{HeaderMapExt, ReadHeaders, WriteHeaders};
pub use request::{RawRequest, ReadRequest};
pub use response::{BufferedResponse, ResponseParts, ResponseSink, WriteResponse};
