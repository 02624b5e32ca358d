//! tgzfs: browse a `.tar.gz` archive as a read-only filesystem
//!
//! The archive is scanned once to build an inode tree; after that, every
//! filesystem operation is answered from the frozen tree, and file reads
//! stream the requested bytes straight out of the compressed archive.
//! Nothing is ever extracted to disk.
//! - Archive scanning and path-sorted indexing (`tar` + `flate2`)
//! - Inode tree with stable, deterministic numbering
//! - Operation backend: attributes, lookup, listing, reads
//! - Optional FUSE binding (`fuse` feature)
//!
//! # Example
//!
//! ```no_run
//! use tgzfs::{TgzFs, ROOT_INODE};
//!
//! let fs = TgzFs::open("site.tar.gz")?;
//! let (docs, _) = fs.lookup(ROOT_INODE, "docs")?;
//! let (readme, attrs) = fs.lookup(docs, "README.md")?;
//!
//! let mut buf = vec![0u8; attrs.size as usize];
//! let n = fs.read_file(readme, 0, &mut buf)?;
//! println!("{}", String::from_utf8_lossy(&buf[..n]));
//! # Ok::<(), tgzfs::error::TgzfsError>(())
//! ```

// Core modules
pub mod archive;
pub mod config;
pub mod error;
pub mod fs;
pub mod snapshot;
pub mod tree;

// Re-export commonly used types
pub use archive::{ArchiveEntry, ArchiveSource, FileSource, MemorySource, OpenWith};
pub use config::MountConfig;
pub use error::{ErrorKind, Result, TgzfsError};
pub use fs::{FsStats, TgzFs};
pub use snapshot::{SnapshotEntry, TreeSnapshot};
pub use tree::{
    DirectoryEntry, EntryKind, InodeAttributes, InodeId, InodeTree, PathIndex, ROOT_INODE,
};
