use crate::archive::{index_archive, ArchiveScanner, ArchiveSource, FileSource};
use crate::error::{Result, TgzfsError};
use crate::fs::dirent::write_dirent;
use crate::snapshot::TreeSnapshot;
use crate::tree::{build_tree, DirectoryEntry, Inode, InodeAttributes, InodeId, InodeTree, PathIndex};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Block size reported by [`TgzFs::statfs`]
pub const BLOCK_SIZE: u32 = 512;

/// Longest name reported by [`TgzFs::statfs`]
pub const MAX_NAME_LENGTH: u32 = 255;

/// Filesystem-wide statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    pub blocks: u64,
    pub files: u64,
    pub block_size: u32,
    pub name_length: u32,
}

/// Read-only filesystem over one compressed archive
///
/// Construction scans the archive once and freezes the inode table and path
/// index; every operation afterwards takes `&self`, so a single instance can
/// be shared across threads without locking. File reads open a fresh stream
/// per call and never touch shared state.
pub struct TgzFs {
    source: Arc<dyn ArchiveSource>,
    tree: InodeTree,
    paths: PathIndex,
}

/// This is the operation contract the kernel transport calls into.
impl TgzFs {
    /// Build from an archive file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(FileSource::new(path))
    }

    /// Scan, index, build the tree, and resolve file paths
    pub fn build<S: ArchiveSource + 'static>(source: S) -> Result<Self> {
        Self::build_shared(Arc::new(source))
    }

    pub fn build_shared(source: Arc<dyn ArchiveSource>) -> Result<Self> {
        let started = Instant::now();

        let entries = index_archive(source.as_ref())?;
        let tree = build_tree(&entries)?;
        let paths = PathIndex::resolve(&tree);

        info!(
            archive = %source.describe(),
            inodes = tree.len(),
            directories = tree.directory_count(),
            files = paths.len(),
            elapsed = ?started.elapsed(),
            "Built inode table"
        );

        Ok(Self {
            source,
            tree,
            paths,
        })
    }

    pub fn tree(&self) -> &InodeTree {
        &self.tree
    }

    pub fn path_index(&self) -> &PathIndex {
        &self.paths
    }

    fn inode(&self, id: InodeId) -> Result<&Inode> {
        self.tree.get(id).ok_or(TgzfsError::InodeNotFound(id))
    }

    pub fn get_attributes(&self, id: InodeId) -> Result<InodeAttributes> {
        let attributes = *self.inode(id)?.attributes();
        debug!(inode = id, ?attributes, "getattr");
        Ok(attributes)
    }

    pub fn lookup(&self, parent: InodeId, name: &str) -> Result<(InodeId, InodeAttributes)> {
        let child = self
            .inode(parent)?
            .child(name)
            .ok_or_else(|| TgzfsError::EntryNotFound {
                parent,
                name: name.to_string(),
            })?;
        let attributes = *self.inode(child.inode)?.attributes();
        debug!(parent, name, child = child.inode, "lookup");
        Ok((child.inode, attributes))
    }

    pub fn open_directory(&self, id: InodeId) -> Result<()> {
        if !self.inode(id)?.is_dir() {
            return Err(TgzfsError::NotADirectory(id));
        }
        Ok(())
    }

    pub fn open_file(&self, id: InodeId) -> Result<()> {
        if self.inode(id)?.is_dir() {
            return Err(TgzfsError::IsADirectory(id));
        }
        Ok(())
    }

    /// Children from `start_offset` on, in stored order
    ///
    /// `start_offset` is the cookie of the last entry already consumed
    /// (zero for a fresh listing), so the slice starts at index
    /// `start_offset`. An offset equal to the child count yields an empty
    /// slice; anything larger is an error.
    pub fn directory_entries(&self, id: InodeId, start_offset: u64) -> Result<&[DirectoryEntry]> {
        let inode = self.inode(id)?;
        if !inode.is_dir() {
            return Err(TgzfsError::NotADirectory(id));
        }

        let children = inode.children();
        let start = usize::try_from(start_offset)
            .ok()
            .filter(|&start| start <= children.len())
            .ok_or(TgzfsError::InvalidOffset {
                inode: id,
                offset: start_offset,
                count: children.len(),
            })?;

        Ok(&children[start..])
    }

    /// Serialize as many entries as fit into `buf`, returning bytes written
    pub fn read_directory(&self, id: InodeId, start_offset: u64, buf: &mut [u8]) -> Result<usize> {
        let mut written = 0;
        for entry in self.directory_entries(id, start_offset)? {
            let n = write_dirent(&mut buf[written..], entry);
            if n == 0 {
                break;
            }
            written += n;
        }
        debug!(inode = id, start_offset, written, "readdir");
        Ok(written)
    }

    /// Copy up to `buf.len()` bytes of the file starting at `offset`
    ///
    /// Each call decompresses the archive from the start and discards
    /// everything before the requested range. Returns zero at or past the
    /// end of the content.
    pub fn read_file(&self, id: InodeId, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let location = self.paths.get(id).ok_or(TgzfsError::PathNotIndexed(id))?;
        let path = location.path.as_str();

        let result = self.read_at(location.position, path, offset, buf);
        match &result {
            Ok(n) => debug!(inode = id, path, offset, bytes = n, "read"),
            Err(e) => error!(inode = id, path, offset, error = %e, "read failed"),
        }
        result
    }

    fn read_at(&self, position: usize, path: &str, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let read_failed = |source: io::Error| TgzfsError::ReadFailed {
            path: path.to_string(),
            source,
        };
        let stream_failed = |err: TgzfsError| match err {
            TgzfsError::Stream(source) => read_failed(source),
            TgzfsError::InvalidGzip => {
                read_failed(io::Error::new(io::ErrorKind::InvalidData, "not a gzip stream"))
            }
            other => other,
        };

        let mut scanner = ArchiveScanner::open(self.source.as_ref()).map_err(stream_failed)?;
        for item in scanner.entries().map_err(stream_failed)? {
            let mut entry = item.map_err(stream_failed)?;
            if entry.position() < position {
                continue;
            }
            if entry.position() > position || entry.path() != path {
                break;
            }

            entry.skip(offset).map_err(read_failed)?;
            return entry.read_into(buf).map_err(read_failed);
        }

        Err(TgzfsError::EntryMissing(path.to_string()))
    }

    /// Fixed read-only statistics: nothing is ever free
    pub fn statfs(&self) -> FsStats {
        let block_size = u64::from(BLOCK_SIZE);
        FsStats {
            blocks: self.tree.total_bytes().div_ceil(block_size),
            files: self.tree.len() as u64,
            block_size: BLOCK_SIZE,
            name_length: MAX_NAME_LENGTH,
        }
    }

    /// Serializable listing of the whole tree
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.tree)
    }
}
