//! Temporary-file-backed chunked delivery of rendered images.
//!
//! The full image is serialized before any transport begins; the stream then
//! yields bounded chunks on demand. Cleanup of the backing file rides on the
//! `TempPath` guard, so it fires whether the stream is drained to the end or
//! dropped mid-consumption.

use std::io::{self, Seek};
use std::num::NonZeroUsize;

use async_stream::try_stream;
use bytes::Bytes;
use futures::Stream;
use metrics::counter;
use tempfile::{Builder, TempPath};
use tokio::{fs::File, io::AsyncReadExt};

use super::qrcode::RenderedImage;

/// A rendered image persisted to a temporary file, ready to be drained as a
/// finite, forward-only sequence of byte chunks.
pub struct ImageStream {
    file: File,
    path: TempPath,
    chunk_size: usize,
}

impl ImageStream {
    /// Serialize `image` into a fresh temporary file named with the resolved
    /// format extension, rewound and ready for reading.
    pub fn persist(
        image: &RenderedImage,
        extension: &str,
        chunk_size: NonZeroUsize,
    ) -> io::Result<Self> {
        let mut backing = Builder::new()
            .prefix("tessera-")
            .suffix(&format!(".{extension}"))
            .tempfile()?;

        image.write_to(backing.as_file_mut())?;

        let (mut file, path) = backing.into_parts();
        file.rewind()?;

        Ok(Self {
            file: File::from_std(file),
            path,
            chunk_size: chunk_size.get(),
        })
    }

    #[cfg(test)]
    pub(crate) fn backing_path(&self) -> std::path::PathBuf {
        self.path.to_path_buf()
    }

    /// Consume the stream handle and yield the file content in order, at
    /// most `chunk_size` bytes per chunk. The backing file is deleted when
    /// the sequence finishes or the stream is dropped.
    pub fn into_chunks(self) -> impl Stream<Item = io::Result<Bytes>> + Send {
        let Self {
            mut file,
            path,
            chunk_size,
        } = self;

        try_stream! {
            // Holds the delete-on-drop guard across every exit path.
            let _backing = path;
            let mut buffer = vec![0u8; chunk_size];
            loop {
                let read = file.read(&mut buffer).await?;
                if read == 0 {
                    break;
                }
                counter!("tessera_stream_bytes_total").increment(read as u64);
                yield Bytes::copy_from_slice(&buffer[..read]);
            }
        }
    }
}
