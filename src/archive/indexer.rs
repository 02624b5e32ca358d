use crate::archive::scanner::{ArchiveEntry, ArchiveScanner};
use crate::archive::source::ArchiveSource;
use crate::error::Result;
use tracing::{debug, info};

/// Scan the whole archive once and return its entries sorted by path
///
/// Ties keep stream order, so repeated mounts of the same archive number
/// their inodes identically.
pub fn index_archive(source: &dyn ArchiveSource) -> Result<Vec<ArchiveEntry>> {
    let mut scanner = ArchiveScanner::open(source)?;

    let mut entries = Vec::new();
    for item in scanner.entries()? {
        let entry = item?.into_meta();
        debug!(
            path = %entry.path,
            is_dir = entry.is_dir,
            size = entry.size,
            "Indexed archive entry"
        );
        entries.push(entry);
    }

    // sort_by is stable
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        archive = %source.describe(),
        entries = entries.len(),
        "Indexed archive"
    );
    Ok(entries)
}
