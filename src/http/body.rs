use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::{self, AsyncRead, AsyncReadExt};

const CHUNK_SIZE: usize = 8 * 1024;

/// Request body as delivered by the transport: a one-shot sequence of byte chunks.
pub type BodyStream = BoxStream<'static, io::Result<Vec<u8>>>;

pub fn empty() -> BodyStream {
    stream::empty().boxed()
}

/// A body made of already-buffered chunks.
pub fn from_chunks<I>(chunks: I) -> BodyStream
where
    I: IntoIterator<Item = Vec<u8>>,
    I::IntoIter: Send + 'static,
{
    stream::iter(chunks.into_iter().map(Ok)).boxed()
}

/// Stream exactly `length` bytes out of `reader`.
///
/// Hitting EOF before `length` bytes were read yields a single
/// `UnexpectedEof` error and ends the stream.
pub fn with_length<R>(reader: R, length: usize) -> BodyStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    stream::unfold(Some((reader, length)), |state| async move {
        let (mut reader, remaining) = match state {
            Some((reader, remaining)) if remaining > 0 => (reader, remaining),
            _ => return None,
        };
        let mut buf = vec![0; remaining.min(CHUNK_SIZE)];
        match reader.read(&mut buf).await {
            Ok(0) => Some((
                Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("connection closed with {remaining} body bytes outstanding"),
                )),
                None,
            )),
            Ok(read) => {
                buf.truncate(read);
                Some((Ok(buf), Some((reader, remaining - read))))
            }
            Err(err) => Some((Err(err), None)),
        }
    })
    .boxed()
}
