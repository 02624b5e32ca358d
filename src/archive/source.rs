use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Boxed byte stream handed to the scanner
pub type ArchiveStream = Box<dyn Read + Send>;

/// Something that can (re)open the same logical archive any number of times
///
/// Every scan starts from a fresh stream, so implementations must return a
/// reader positioned at the first byte of the compressed archive on each call.
pub trait ArchiveSource: Send + Sync {
    /// Open a new stream over the compressed archive
    fn open(&self) -> io::Result<ArchiveStream>;

    /// Human-readable name used in logs
    fn describe(&self) -> String {
        "<archive>".to_string()
    }
}

/// Archive stored in a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for FileSource {
    fn open(&self) -> io::Result<ArchiveStream> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Archive held entirely in memory
#[derive(Clone)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ArchiveSource for MemorySource {
    fn open(&self) -> io::Result<ArchiveStream> {
        Ok(Box::new(Cursor::new(SharedBytes(self.bytes.clone()))))
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }
}

struct SharedBytes(Arc<[u8]>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Adapts a caller-supplied opener closure
pub struct OpenWith<F>(pub F);

impl<F> ArchiveSource for OpenWith<F>
where
    F: Fn() -> io::Result<ArchiveStream> + Send + Sync,
{
    fn open(&self) -> io::Result<ArchiveStream> {
        (self.0)()
    }
}
