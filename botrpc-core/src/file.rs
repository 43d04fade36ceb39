//! File attachments.
//!
//! An [`InputFile`] is binary content uploaded as a multipart file part. The
//! content is either an in-memory buffer or a byte stream that is drained
//! before the request is sent.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

/// Boxed stream of byte chunks.
pub type BoxByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send>>;

/// A byte stream, optionally remembering the filesystem path it reads from.
///
/// The path is only used to derive a file name when none was given.
pub struct ByteStream {
    inner: BoxByteStream,
    path: Option<PathBuf>,
}

impl ByteStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            path: None,
        }
    }

    /// Attach the path the stream was opened from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Last component of [`path`](Self::path), if it is valid UTF-8.
    pub fn file_name(&self) -> Option<&str> {
        self.path.as_deref()?.file_name()?.to_str()
    }
}

impl Stream for ByteStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Where the content of an [`InputFile`] comes from.
#[derive(Debug)]
pub enum FileSource {
    /// Content already in memory.
    Bytes(Bytes),
    /// Content produced by a stream; can be read only once.
    Stream(ByteStream),
}

/// A file to upload.
///
/// `name` and `mime` become the `filename` and `Content-Type` of the file
/// part. Both are optional; a stream opened from a path falls back to the
/// path's file name.
///
/// # Example
///
/// ```
/// use botrpc_core::InputFile;
///
/// let file = InputFile::bytes("# Title\n")
///     .with_name("readme.txt")
///     .with_mime("text/plain");
///
/// assert_eq!(file.name(), Some("readme.txt"));
/// assert_eq!(file.mime(), Some("text/plain"));
/// ```
#[derive(Debug)]
pub struct InputFile {
    source: FileSource,
    name: Option<String>,
    mime: Option<String>,
}

impl InputFile {
    /// Create a file from an in-memory buffer.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Self {
            source: FileSource::Bytes(data.into()),
            name: None,
            mime: None,
        }
    }

    /// Create a file from a byte stream.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self::from(ByteStream::new(stream))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// The explicit file name, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.source, FileSource::Stream(_))
    }

    /// Split into `(source, name, mime)`.
    pub fn into_parts(self) -> (FileSource, Option<String>, Option<String>) {
        (self.source, self.name, self.mime)
    }
}

impl From<ByteStream> for InputFile {
    fn from(stream: ByteStream) -> Self {
        Self {
            source: FileSource::Stream(stream),
            name: None,
            mime: None,
        }
    }
}

impl From<Bytes> for InputFile {
    fn from(data: Bytes) -> Self {
        Self::bytes(data)
    }
}

impl From<Vec<u8>> for InputFile {
    fn from(data: Vec<u8>) -> Self {
        Self::bytes(data)
    }
}

impl From<&'static [u8]> for InputFile {
    fn from(data: &'static [u8]) -> Self {
        Self::bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn test_bytes_file() {
        let file = InputFile::from(vec![1u8, 2, 3]);
        assert!(!file.is_stream());
        assert!(file.name().is_none());
        match file.source() {
            FileSource::Bytes(data) => assert_eq!(data.as_ref(), &[1, 2, 3]),
            FileSource::Stream(_) => panic!("expected bytes"),
        }
    }

    #[test]
    fn test_stream_file_name_from_path() {
        let stream = ByteStream::new(futures::stream::empty::<io::Result<Bytes>>())
            .with_path("/tmp/photos/cat.png");
        assert_eq!(stream.file_name(), Some("cat.png"));

        let file = InputFile::from(stream);
        assert!(file.is_stream());
        // An explicit name is never inferred from the path here.
        assert!(file.name().is_none());
    }

    #[tokio::test]
    async fn test_byte_stream_yields_chunks() {
        let chunks: Vec<io::Result<Bytes>> = vec![Ok(Bytes::from("a")), Ok(Bytes::from("b"))];
        let mut stream = ByteStream::new(futures::stream::iter(chunks));

        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from("a"));
        assert_eq!(stream.next().await.unwrap().unwrap(), Bytes::from("b"));
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_into_parts() {
        let (source, name, mime) = InputFile::bytes("x")
            .with_name("x.bin")
            .with_mime("application/x-test")
            .into_parts();
        assert!(matches!(source, FileSource::Bytes(_)));
        assert_eq!(name.as_deref(), Some("x.bin"));
        assert_eq!(mime.as_deref(), Some("application/x-test"));
    }
}
