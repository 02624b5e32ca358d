use crate::archive::path::{has_directory_marker, normalize_path};
use crate::archive::source::{ArchiveSource, ArchiveStream};
use crate::error::{Result, TgzfsError};
use flate2::read::MultiGzDecoder;
use std::io::{self, Chain, Cursor, Read};
use tracing::warn;

/// gzip magic bytes (RFC 1952)
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

type GzStream = MultiGzDecoder<Chain<Cursor<[u8; 2]>, ArchiveStream>>;

/// One archive record as seen by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Normalized path relative to the archive root
    pub path: String,
    pub is_dir: bool,
    /// Content length in bytes (zero for directories)
    pub size: u64,
    /// Zero-based position of the record in stream order
    pub position: usize,
}

/// Forward-only pass over a gzip-compressed tar stream
///
/// A scanner is single-use; start another pass by opening a new one.
pub struct ArchiveScanner {
    archive: tar::Archive<GzStream>,
}

impl ArchiveScanner {
    /// Open the source and validate the gzip envelope
    pub fn open(source: &dyn ArchiveSource) -> Result<Self> {
        let mut stream = source.open()?;

        let mut magic = [0u8; 2];
        match stream.read_exact(&mut magic) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(TgzfsError::InvalidGzip)
            }
            Err(e) => return Err(e.into()),
        }
        if magic != GZIP_MAGIC {
            return Err(TgzfsError::InvalidGzip);
        }

        let decoder = MultiGzDecoder::new(Cursor::new(magic).chain(stream));
        Ok(Self {
            archive: tar::Archive::new(decoder),
        })
    }

    /// Lazily iterate the entries in on-disk order
    pub fn entries(&mut self) -> Result<ScanEntries<'_>> {
        Ok(ScanEntries {
            inner: self.archive.entries()?,
            position: 0,
        })
    }
}

/// Iterator over [`ScannedEntry`] values
pub struct ScanEntries<'a> {
    inner: tar::Entries<'a, GzStream>,
    position: usize,
}

impl<'a> Iterator for ScanEntries<'a> {
    type Item = Result<ScannedEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            let entry_type = entry.header().entry_type();
            if entry_type.is_pax_global_extensions() {
                warn!("Skipping pax global header");
                continue;
            }

            let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let is_dir = entry_type.is_dir() || has_directory_marker(&raw);
            let meta = ArchiveEntry {
                path: normalize_path(&raw),
                is_dir,
                size: if is_dir { 0 } else { entry.size() },
                position: self.position,
            };
            self.position += 1;

            return Some(Ok(ScannedEntry { meta, entry }));
        }
    }
}

/// An entry plus streaming access to its content
pub struct ScannedEntry<'a> {
    meta: ArchiveEntry,
    entry: tar::Entry<'a, GzStream>,
}

impl<'a> ScannedEntry<'a> {
    pub fn meta(&self) -> &ArchiveEntry {
        &self.meta
    }

    pub fn into_meta(self) -> ArchiveEntry {
        self.meta
    }

    pub fn path(&self) -> &str {
        &self.meta.path
    }

    pub fn position(&self) -> usize {
        self.meta.position
    }

    /// Consume and drop the next `count` content bytes, returning how many were skipped
    pub fn skip(&mut self, count: u64) -> io::Result<u64> {
        io::copy(&mut (&mut self.entry).take(count), &mut io::sink())
    }

    /// Fill as much of `buf` as the remaining content allows
    pub fn read_into(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.entry.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl Read for ScannedEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.entry.read(buf)
    }
}
