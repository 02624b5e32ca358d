use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inode number (matches the kernel's 64-bit inode convention)
pub type InodeId = u64;

/// Reserved id of the root directory
pub const ROOT_INODE: InodeId = 1;

const S_IFDIR: u32 = 0o040000;
const S_IFREG: u32 = 0o100000;

/// Permission bits for every directory: r-xr-xr-x
pub const DIR_PERMISSIONS: u32 = 0o555;

/// Permission bits for every file: r--r--r--
pub const FILE_PERMISSIONS: u32 = 0o444;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Attributes reported for an inode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InodeAttributes {
    pub kind: EntryKind,
    /// Full `st_mode`, including the file type bits
    pub mode: u32,
    pub nlink: u32,
    pub size: u64,
}

impl InodeAttributes {
    pub fn directory() -> Self {
        Self {
            kind: EntryKind::Directory,
            mode: S_IFDIR | DIR_PERMISSIONS,
            nlink: 1,
            size: 0,
        }
    }

    pub fn file(size: u64) -> Self {
        Self {
            kind: EntryKind::File,
            mode: S_IFREG | FILE_PERMISSIONS,
            nlink: 1,
            size,
        }
    }

    /// Permission bits without the file type
    pub fn permissions(&self) -> u16 {
        (self.mode & 0o7777) as u16
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A named child reference inside a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub inode: InodeId,
    /// 1-based position within the parent's child list
    pub offset: u64,
    pub kind: EntryKind,
}

/// A node of the served tree
#[derive(Debug, Clone)]
pub struct Inode {
    id: InodeId,
    attributes: InodeAttributes,
    children: Vec<DirectoryEntry>,
    by_name: HashMap<String, usize>,
    position: Option<usize>,
}

impl Inode {
    pub(crate) fn new_directory(id: InodeId) -> Self {
        Self {
            id,
            attributes: InodeAttributes::directory(),
            children: Vec::new(),
            by_name: HashMap::new(),
            position: None,
        }
    }

    pub(crate) fn new_file(id: InodeId, size: u64, position: usize) -> Self {
        Self {
            id,
            attributes: InodeAttributes::file(size),
            children: Vec::new(),
            by_name: HashMap::new(),
            position: Some(position),
        }
    }

    pub fn id(&self) -> InodeId {
        self.id
    }

    pub fn attributes(&self) -> &InodeAttributes {
        &self.attributes
    }

    pub fn is_dir(&self) -> bool {
        self.attributes.is_dir()
    }

    /// Children in insertion order (empty for files)
    pub fn children(&self) -> &[DirectoryEntry] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&DirectoryEntry> {
        self.by_name.get(name).map(|&index| &self.children[index])
    }

    /// Stream position of the archive record backing a file inode
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Append a child, assigning it the next offset
    pub(crate) fn push_child(&mut self, name: &str, inode: InodeId, kind: EntryKind) {
        let index = self.children.len();
        self.children.push(DirectoryEntry {
            name: name.to_string(),
            inode,
            offset: index as u64 + 1,
            kind,
        });
        self.by_name.insert(name.to_string(), index);
    }
}
