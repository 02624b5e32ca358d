//! Serializable listing of a built tree
//!
//! A snapshot records every inode with its full path, kind, and size, in
//! depth-first order with children in stored order. It is what
//! `tgzfs --print-tree` emits, and a convenient way to diff the layout two
//! archives produce.
//!
//! ```no_run
//! use tgzfs::TgzFs;
//! # use tgzfs::error::Result;
//!
//! # fn main() -> Result<()> {
//! let fs = TgzFs::open("backup.tar.gz")?;
//! let snapshot = fs.snapshot();
//! println!("{}", String::from_utf8_lossy(&snapshot.to_json()?));
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, TgzfsError};
use crate::tree::{EntryKind, InodeId, InodeTree, ROOT_INODE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub inode_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub path: String,
    pub inode: InodeId,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: u64,
}

fn is_zero(size: &u64) -> bool {
    *size == 0
}

impl TreeSnapshot {
    /// Depth-first walk of the tree, root excluded
    pub fn capture(tree: &InodeTree) -> Self {
        let mut entries = Vec::with_capacity(tree.len().saturating_sub(1));
        let mut pending: Vec<(InodeId, String, usize)> = vec![(ROOT_INODE, String::new(), 0)];

        while let Some((dir_id, prefix, next)) = pending.pop() {
            let Some(child) = tree.get(dir_id).and_then(|dir| dir.children().get(next)) else {
                continue;
            };
            pending.push((dir_id, prefix.clone(), next + 1));

            let path = if prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{}/{}", prefix, child.name)
            };
            let size = tree
                .get(child.inode)
                .map(|inode| inode.attributes().size)
                .unwrap_or(0);

            entries.push(SnapshotEntry {
                path: path.clone(),
                inode: child.inode,
                kind: child.kind,
                size,
            });

            if child.kind == EntryKind::Directory {
                pending.push((child.inode, path, 0));
            }
        }

        Self {
            inode_count: tree.len(),
            total_bytes: tree.total_bytes(),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(TgzfsError::from)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(TgzfsError::from)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }
}
