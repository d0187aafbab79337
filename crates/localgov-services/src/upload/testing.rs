//! Instrumented readers and upload constructors shared by pipeline tests.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::time::Sleep;

use super::types::RawUpload;

pub(crate) fn upload(name: &str, data: &'static [u8]) -> RawUpload {
    RawUpload::from_bytes(name, "image/jpeg", Bytes::from_static(data))
}

/// An upload whose reader emits a few bytes and then fails, so the worker
/// sees a mid-copy I/O error with a partial file already on disk.
pub(crate) fn upload_that_fails(name: &str) -> RawUpload {
    RawUpload::new(
        name,
        "application/octet-stream",
        1024,
        Box::pin(FailingReader { emitted: false }),
    )
}

/// An upload whose reader never completes; only cancellation unblocks the
/// worker that picked it up.
pub(crate) fn pending_upload(name: &str) -> RawUpload {
    RawUpload::new(name, "application/octet-stream", 1024, Box::pin(PendingReader))
}

/// An upload that holds its read window open for a short delay and tracks
/// how many readers are in flight at once.
pub(crate) fn gauge_upload(name: &str, gauge: Arc<Gauge>) -> RawUpload {
    RawUpload::new(
        name,
        "application/octet-stream",
        4,
        Box::pin(GaugeReader {
            gauge,
            delay: None,
            payload: Some(b"data"),
            entered: false,
            finished: false,
        }),
    )
}

/// High-water-mark counter for concurrently active readers.
#[derive(Default)]
pub(crate) struct Gauge {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn observed_max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

struct FailingReader {
    emitted: bool,
}

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if !this.emitted {
            this.emitted = true;
            buf.put_slice(b"partial");
            Poll::Ready(Ok(()))
        } else {
            Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "injected read failure",
            )))
        }
    }
}

struct PendingReader;

impl AsyncRead for PendingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        // Stays pending until the surrounding select! is resolved by the
        // cancellation branch.
        Poll::Pending
    }
}

struct GaugeReader {
    gauge: Arc<Gauge>,
    delay: Option<Pin<Box<Sleep>>>,
    payload: Option<&'static [u8]>,
    entered: bool,
    finished: bool,
}

impl AsyncRead for GaugeReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if !this.entered {
            this.entered = true;
            this.gauge.enter();
            this.delay = Some(Box::pin(tokio::time::sleep(Duration::from_millis(25))));
        }

        if let Some(delay) = this.delay.as_mut() {
            match delay.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(()) => this.delay = None,
            }
        }

        if let Some(payload) = this.payload.take() {
            buf.put_slice(payload);
            return Poll::Ready(Ok(()));
        }

        if !this.finished {
            this.finished = true;
            this.gauge.exit();
        }

        // Empty read signals EOF.
        Poll::Ready(Ok(()))
    }
}
