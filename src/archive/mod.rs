mod indexer;
mod path;
mod scanner;
mod source;

#[cfg(test)]
pub(crate) mod fixtures;

pub use indexer::index_archive;
pub use path::{has_directory_marker, normalize_path};
pub use scanner::{ArchiveEntry, ArchiveScanner, ScanEntries, ScannedEntry, GZIP_MAGIC};
pub use source::{ArchiveSource, ArchiveStream, FileSource, MemorySource, OpenWith};
