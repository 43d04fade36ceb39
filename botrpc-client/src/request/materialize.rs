//! Draining file streams into memory.

use std::io;
use std::path::Path;

use botrpc_core::{ByteStream, FileSource, InputFile};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;
use tokio_util::io::ReaderStream;

/// File content fully read into memory.
#[derive(Debug)]
pub struct MaterializedFile {
    pub data: Bytes,
    /// Explicit name, else the basename of the stream's source path.
    pub name: Option<String>,
    pub mime: Option<String>,
}

/// Read a file's content into memory.
///
/// A stream is drained exactly once, chunks concatenated in arrival order.
/// The first stream error aborts and is returned.
pub async fn materialize(file: InputFile) -> io::Result<MaterializedFile> {
    let (source, name, mime) = file.into_parts();
    match source {
        FileSource::Bytes(data) => Ok(MaterializedFile { data, name, mime }),
        FileSource::Stream(stream) => {
            let name = name.or_else(|| stream.file_name().map(str::to_owned));
            let data = stream
                .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                    buf.extend_from_slice(&chunk);
                    Ok::<_, io::Error>(buf)
                })
                .await?
                .freeze();
            Ok(MaterializedFile { data, name, mime })
        }
    }
}

/// Open a file on disk as a streamed [`InputFile`].
///
/// The file name defaults to the path's basename.
pub async fn open_file(path: impl AsRef<Path>) -> io::Result<InputFile> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    Ok(InputFile::from(ByteStream::new(ReaderStream::new(file)).with_path(path)))
}
