use crate::archive::ArchiveEntry;
use crate::error::{Result, TgzfsError};
use crate::tree::inode::{EntryKind, Inode, InodeId, ROOT_INODE};
use crate::tree::InodeTree;
use tracing::{debug, warn};

/// Grows an inode arena from path-sorted archive entries
///
/// Ids are handed out in creation order, starting right after the root.
/// Intermediate directories are created on first sight and reused by every
/// later entry under them, whether implied or declared.
pub struct TreeBuilder {
    inodes: Vec<Inode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            inodes: vec![Inode::new_directory(ROOT_INODE)],
        }
    }

    /// Place one entry into the tree
    pub fn insert(&mut self, entry: &ArchiveEntry) -> Result<()> {
        let path = entry.path.as_str();

        if path.is_empty() {
            if entry.is_dir {
                debug!("Root directory entry absorbed");
                return Ok(());
            }
            return Err(TgzfsError::malformed(path, "file entry with an empty path"));
        }

        let segments: Vec<&str> = path.split('/').collect();
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(TgzfsError::malformed(
                path,
                format!("invalid path segment {:?}", bad),
            ));
        }
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(TgzfsError::malformed(path, "no path segments"));
        };

        let mut current = ROOT_INODE;
        for segment in parents {
            let existing = self
                .node(current)
                .child(segment)
                .map(|child| (child.inode, child.kind));

            current = match existing {
                Some((id, EntryKind::Directory)) => id,
                Some((_, EntryKind::File)) => {
                    return Err(TgzfsError::malformed(
                        path,
                        format!("{:?} is a file, not a directory", segment),
                    ))
                }
                None => {
                    self.add_child(current, segment, EntryKind::Directory, Inode::new_directory)?
                }
            };
        }

        let existing = self.node(current).child(leaf).map(|child| child.kind);
        match existing {
            Some(EntryKind::Directory) if entry.is_dir => {
                debug!(path, "Directory already present, reusing inode");
            }
            Some(kind) => {
                warn!(
                    path,
                    existing = ?kind,
                    "Duplicate archive path, keeping the first occurrence"
                );
            }
            None if entry.is_dir => {
                self.add_child(current, leaf, EntryKind::Directory, Inode::new_directory)?;
            }
            None => {
                let (size, position) = (entry.size, entry.position);
                self.add_child(current, leaf, EntryKind::File, |id| {
                    Inode::new_file(id, size, position)
                })?;
            }
        }

        Ok(())
    }

    pub fn finish(self) -> InodeTree {
        InodeTree::from_inodes(self.inodes)
    }

    fn node(&self, id: InodeId) -> &Inode {
        &self.inodes[(id - ROOT_INODE) as usize]
    }

    fn add_child<F>(&mut self, parent: InodeId, name: &str, kind: EntryKind, make: F) -> Result<InodeId>
    where
        F: FnOnce(InodeId) -> Inode,
    {
        let id = (self.inodes.len() as u64)
            .checked_add(ROOT_INODE)
            .ok_or_else(|| TgzfsError::malformed(name, "inode id space exhausted"))?;

        self.inodes.push(make(id));
        self.inodes[(parent - ROOT_INODE) as usize].push_child(name, id, kind);
        Ok(id)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the complete tree from sorted entries
pub fn build_tree(entries: &[ArchiveEntry]) -> Result<InodeTree> {
    let mut builder = TreeBuilder::new();
    for entry in entries {
        builder.insert(entry)?;
    }
    Ok(builder.finish())
}
