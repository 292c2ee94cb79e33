//! Storage abstraction: the byte source a tag is parsed from.
//!
//! The parser never interprets paths or writes anything. It only needs
//! positioned reads, absolute seeks and the total size of the source.

use std::fs;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;

use tracing::warn;

use crate::error::{ParseError, ParseResult};

/// A readable, seekable byte source with a known size.
pub trait TagSource {
    /// Read into `buf` from the current position, returning the byte count.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Seek to an absolute offset.
    fn seek(&mut self, pos: u64) -> io::Result<u64>;

    /// Total size of the source in bytes.
    fn size(&self) -> u64;
}

impl<T: TagSource + ?Sized> TagSource for &mut T {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_bytes(buf)
    }

    fn seek(&mut self, pos: u64) -> io::Result<u64> {
        (**self).seek(pos)
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Opens named sources.
pub trait Storage {
    type File: TagSource;

    /// Open a file for reading
    fn open(&mut self, name: &str) -> io::Result<Self::File>;
}

/// Adapts any `Read + Seek` value (a file, an in-memory cursor) into a [`TagSource`].
#[derive(Debug)]
pub struct StreamSource<R> {
    inner: R,
    size: u64,
}

impl<R: Read + Seek> StreamSource<R> {
    /// Wrap `inner`, measuring its size and rewinding to the start.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(StreamSource { inner, size })
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl StreamSource<io::Cursor<Vec<u8>>> {
    /// In-memory source over an owned buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        StreamSource {
            inner: io::Cursor::new(bytes),
            size,
        }
    }
}

impl<R: Read + Seek> TagSource for StreamSource<R> {
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn seek(&mut self, pos: u64) -> io::Result<u64> {
        self.inner.seek(SeekFrom::Start(pos))
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// An open file on the local filesystem.
pub type LocalFile = StreamSource<BufReader<fs::File>>;

/// A [`Storage`] backed by `std::fs`.
///
/// Names passed to [`LocalStorage::open`] are resolved relative to the root
/// given at construction. Absolute names replace the root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStorage { root: root.into() }
    }

    /// Storage rooted at the process working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    type File = LocalFile;

    fn open(&mut self, name: &str) -> io::Result<Self::File> {
        let file = fs::File::open(self.root.join(name))?;
        StreamSource::new(BufReader::new(file))
    }
}

/// Fill `buf` from the source at `offset`, treating a short read as fatal.
///
/// Reads are repeated until the buffer is full or the source reports end of
/// data, so only a genuinely truncated source produces `ShortRead`.
pub fn read_full<S: TagSource + ?Sized>(
    source: &mut S,
    buf: &mut [u8],
    offset: u64,
) -> ParseResult<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read_bytes(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if filled < buf.len() {
        warn!(offset, expected = buf.len(), actual = filled, "short read");
        return Err(ParseError::ShortRead {
            offset,
            expected: buf.len(),
            actual: filled,
        });
    }
    Ok(())
}
