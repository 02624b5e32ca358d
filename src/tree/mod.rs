//! Inode tree built from a sorted archive listing
//!
//! The tree is an append-only arena: inode `id` lives at index `id - 1`.
//! Directories refer to children by id only, so there are no back-pointers
//! and nothing is mutated once [`TreeBuilder::finish`] returns.

mod builder;
mod inode;
mod resolver;

pub use builder::{build_tree, TreeBuilder};
pub use inode::{
    DirectoryEntry, EntryKind, Inode, InodeAttributes, InodeId, DIR_PERMISSIONS,
    FILE_PERMISSIONS, ROOT_INODE,
};
pub use resolver::{FileLocation, PathIndex};

/// Frozen inode table
#[derive(Debug, Clone)]
pub struct InodeTree {
    inodes: Vec<Inode>,
}

impl InodeTree {
    pub(crate) fn from_inodes(inodes: Vec<Inode>) -> Self {
        Self { inodes }
    }

    pub fn get(&self, id: InodeId) -> Option<&Inode> {
        let index = id.checked_sub(ROOT_INODE)?;
        self.inodes.get(usize::try_from(index).ok()?)
    }

    pub fn root(&self) -> &Inode {
        &self.inodes[0]
    }

    /// Child of `parent` named `name`, if both exist
    pub fn lookup(&self, parent: InodeId, name: &str) -> Option<&DirectoryEntry> {
        self.get(parent)?.child(name)
    }

    /// Total inode count, root included
    pub fn len(&self) -> usize {
        self.inodes.len()
    }

    /// Always false; the root is always present
    pub fn is_empty(&self) -> bool {
        self.inodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Inode> {
        self.inodes.iter()
    }

    pub fn directory_count(&self) -> usize {
        self.inodes.iter().filter(|inode| inode.is_dir()).count()
    }

    pub fn file_count(&self) -> usize {
        self.inodes.len() - self.directory_count()
    }

    /// Sum of all file sizes
    pub fn total_bytes(&self) -> u64 {
        self.inodes
            .iter()
            .filter(|inode| !inode.is_dir())
            .map(|inode| inode.attributes().size)
            .sum()
    }
}
