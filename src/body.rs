//! Request body accumulation.
//!
//! hyper hands us the body as a stream of frames. Handlers that care about
//! the payload call [`accumulate`] (through [`Request::text`] or
//! [`Request::json`]) and suspend until the client has sent the last frame.
//! Handlers that don't care never poll the body at all.
//!
//! There is no size limit and no timeout here. A client that never finishes
//! its body parks that one request; every other connection keeps going.
//!
//! [`Request::text`]: crate::Request::text
//! [`Request::json`]: crate::Request::json

use bytes::{Bytes, BytesMut};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use http_body_util::combinators::UnsyncBoxBody;

/// Boxed error produced by the underlying transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The type-erased body carried by every [`Request`](crate::Request).
pub type Body = UnsyncBoxBody<Bytes, BoxError>;

/// Erases any `Bytes`-based body into a [`Body`].
pub fn boxed<B>(body: B) -> Body
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    body.map_err(Into::<BoxError>::into).boxed_unsync()
}

/// Why a request body could not be turned into a value.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("error reading request body: {0}")]
    Transport(#[source] BoxError),
    #[error("request body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// Concatenates every data frame of `body` in arrival order.
///
/// Resolves once, after the transport signals end-of-stream. Trailers are
/// skipped.
pub async fn accumulate<B>(mut body: B) -> Result<Bytes, BodyError>
where
    B: HttpBody<Data = Bytes, Error = BoxError> + Unpin,
{
    let mut buf = BytesMut::new();
    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(BodyError::Transport)?;
        if let Ok(data) = frame.into_data() {
            buf.extend_from_slice(&data);
        }
    }
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use http_body::Frame;
    use http_body_util::{Empty, StreamBody};

    fn chunked(chunks: &[&'static str]) -> Body {
        let frames = chunks
            .iter()
            .map(|c| Ok::<_, BoxError>(Frame::data(Bytes::from_static(c.as_bytes()))))
            .collect::<Vec<_>>();
        boxed(StreamBody::new(stream::iter(frames)))
    }

    #[tokio::test]
    async fn joins_chunks_in_order() {
        let bytes = accumulate(chunked(&[r#"{"name":"#, r#""a","content""#, r#":"b"}"#]))
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"name":"a","content":"b"}"#);
    }

    #[tokio::test]
    async fn empty_body_is_empty() {
        let bytes = accumulate(boxed(Empty::<Bytes>::new())).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn transport_error_surfaces() {
        let frames: Vec<Result<Frame<Bytes>, BoxError>> = vec![
            Ok(Frame::data(Bytes::from_static(b"{"))),
            Err("connection reset".into()),
        ];
        let err = accumulate(boxed(StreamBody::new(stream::iter(frames))))
            .await
            .unwrap_err();
        assert!(matches!(err, BodyError::Transport(_)));
    }
}
