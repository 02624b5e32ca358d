use crate::tree::inode::{EntryKind, InodeId, ROOT_INODE};
use crate::tree::InodeTree;
use std::collections::HashMap;

/// Where a file inode's bytes live in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    /// Canonical archive path
    pub path: String,
    /// Stream position of the backing record
    pub position: usize,
}

/// Reverse index from file inode to archive location
///
/// Directories never appear here.
#[derive(Debug, Default)]
pub struct PathIndex {
    locations: HashMap<InodeId, FileLocation>,
}

impl PathIndex {
    /// Walk the finished tree once and record every file's path
    pub fn resolve(tree: &InodeTree) -> Self {
        let mut locations = HashMap::new();
        let mut pending: Vec<(InodeId, String)> = vec![(ROOT_INODE, String::new())];

        while let Some((dir_id, prefix)) = pending.pop() {
            let Some(dir) = tree.get(dir_id) else {
                continue;
            };

            for child in dir.children() {
                let path = if prefix.is_empty() {
                    child.name.clone()
                } else {
                    format!("{}/{}", prefix, child.name)
                };

                match child.kind {
                    EntryKind::Directory => pending.push((child.inode, path)),
                    EntryKind::File => {
                        if let Some(position) = tree.get(child.inode).and_then(|n| n.position()) {
                            locations.insert(child.inode, FileLocation { path, position });
                        }
                    }
                }
            }
        }

        Self { locations }
    }

    pub fn get(&self, id: InodeId) -> Option<&FileLocation> {
        self.locations.get(&id)
    }

    pub fn contains(&self, id: InodeId) -> bool {
        self.locations.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InodeId, &FileLocation)> {
        self.locations.iter().map(|(id, location)| (*id, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveEntry;
    use crate::tree::build_tree;

    fn entry(path: &str, is_dir: bool, position: usize) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_string(),
            is_dir,
            size: if is_dir { 0 } else { 1 },
            position,
        }
    }

    #[test]
    fn test_every_file_indexed_no_directories() {
        let tree = build_tree(&[
            entry("a/b.txt", false, 1),
            entry("a/c", true, 0),
            entry("a/c/d.txt", false, 2),
            entry("top", false, 3),
        ])
        .unwrap();
        let index = PathIndex::resolve(&tree);

        assert_eq!(index.len(), 3);
        for inode in tree.iter() {
            assert_eq!(index.contains(inode.id()), !inode.is_dir());
        }

        let mut paths: Vec<_> = index.iter().map(|(_, loc)| loc.path.clone()).collect();
        paths.sort();
        assert_eq!(paths, vec!["a/b.txt", "a/c/d.txt", "top"]);

        let a = tree.lookup(ROOT_INODE, "a").unwrap().inode;
        let c = tree.lookup(a, "c").unwrap().inode;
        let d = tree.lookup(c, "d.txt").unwrap().inode;
        assert_eq!(
            index.get(d),
            Some(&FileLocation {
                path: "a/c/d.txt".to_string(),
                position: 2
            })
        );
    }

    #[test]
    fn test_empty_tree() {
        let tree = build_tree(&[]).unwrap();
        assert!(PathIndex::resolve(&tree).is_empty());
    }
}
