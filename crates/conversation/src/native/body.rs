use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use tokio::sync::Mutex;

/// A single-use body handle.
///
/// Clones share one slot: once any clone hands its stream to a reader, every clone reports
/// [`is_consumed`](NativeBody::is_consumed). The stream is taken out under a lock, so among
/// concurrent readers exactly one gets it.
///
/// The handle also remembers the request's `content-type`, which the form reader needs to pick
/// a decoder.
pub struct NativeBody<B> {
    content_type: Option<String>,
    inner: Arc<Mutex<Option<B>>>,
}

impl<B> NativeBody<B> {
    pub fn new(body: B, content_type: Option<String>) -> Self {
        Self { content_type, inner: Arc::new(Mutex::new(Some(body))) }
    }

    /// Creates a handle whose stream is already gone, e.g. drained by the transport.
    pub fn consumed(content_type: Option<String>) -> Self {
        Self { content_type, inner: Arc::new(Mutex::new(None)) }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub async fn is_consumed(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.is_none()
    }

    /// Takes the stream out of the handle, marking it consumed.
    ///
    /// Returns `None` when the stream was taken before.
    pub async fn take(&self) -> Option<B> {
        let mut guard = self.inner.lock().await;
        guard.take()
    }
}

impl<B> Clone for NativeBody<B> {
    fn clone(&self) -> Self {
        Self { content_type: self.content_type.clone(), inner: Arc::clone(&self.inner) }
    }
}

impl<B> fmt::Debug for NativeBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBody").field("content_type", &self.content_type).finish_non_exhaustive()
    }
}

/// A fully buffered response body, emitted as at most one data frame.
#[derive(Debug, Clone, Default)]
pub struct ResponseBody {
    data: Option<Bytes>,
}

impl ResponseBody {
    pub fn empty() -> Self {
        Self { data: None }
    }

    pub fn once(bytes: Bytes) -> Self {
        if bytes.is_empty() { Self::empty() } else { Self { data: Some(bytes) } }
    }

    /// Number of bytes not yet emitted.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Bytes::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Bytes> for ResponseBody {
    fn from(value: Bytes) -> Self {
        Self::once(value)
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        Self::once(Bytes::from(value))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(value: &'static str) -> Self {
        Self::once(Bytes::from_static(value.as_bytes()))
    }
}

impl From<()> for ResponseBody {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl HttpBody for ResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().data.take().map(|bytes| Ok(Frame::data(bytes))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.len() as u64)
    }
}
