//! Directory entry serialization in the kernel's `fuse_dirent` layout
//!
//! Each record is:
//! - Inode: uint64
//! - Offset: uint64 (cookie for resuming the listing after this entry)
//! - Name Length: uint32
//! - Type: uint32 (`DT_DIR` / `DT_REG`)
//! - Name: variable, padded with zeros to an 8-byte boundary
//!
//! All integers are native-endian, as the kernel expects.

use crate::tree::{DirectoryEntry, EntryKind, InodeId};

/// Fixed part of a record
pub const DIRENT_HEADER_SIZE: usize = 24;

const DT_DIR: u32 = 4;
const DT_REG: u32 = 8;

fn dirent_type(kind: EntryKind) -> u32 {
    match kind {
        EntryKind::Directory => DT_DIR,
        EntryKind::File => DT_REG,
    }
}

/// Encoded size of one record, padding included
pub fn dirent_size(name: &str) -> usize {
    (DIRENT_HEADER_SIZE + name.len() + 7) & !7
}

/// Write one record at the start of `buf`
///
/// Returns the number of bytes written, or zero if the record does not fit.
pub fn write_dirent(buf: &mut [u8], entry: &DirectoryEntry) -> usize {
    let size = dirent_size(&entry.name);
    if size > buf.len() {
        return 0;
    }

    let name = entry.name.as_bytes();
    buf[0..8].copy_from_slice(&entry.inode.to_ne_bytes());
    buf[8..16].copy_from_slice(&entry.offset.to_ne_bytes());
    buf[16..20].copy_from_slice(&(name.len() as u32).to_ne_bytes());
    buf[20..24].copy_from_slice(&dirent_type(entry.kind).to_ne_bytes());
    buf[24..24 + name.len()].copy_from_slice(name);
    buf[24 + name.len()..size].fill(0);

    size
}

/// A record decoded from a listing buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDirent {
    pub inode: InodeId,
    pub offset: u64,
    pub kind: Option<EntryKind>,
    pub name: String,
}

/// Decode every complete record in `buf`
pub fn parse_dirents(mut buf: &[u8]) -> Vec<DecodedDirent> {
    let mut out = Vec::new();

    while buf.len() >= DIRENT_HEADER_SIZE {
        let inode = u64::from_ne_bytes(buf[0..8].try_into().unwrap_or_default());
        let offset = u64::from_ne_bytes(buf[8..16].try_into().unwrap_or_default());
        let name_len = u32::from_ne_bytes(buf[16..20].try_into().unwrap_or_default()) as usize;
        let kind = match u32::from_ne_bytes(buf[20..24].try_into().unwrap_or_default()) {
            DT_DIR => Some(EntryKind::Directory),
            DT_REG => Some(EntryKind::File),
            _ => None,
        };

        let size = (DIRENT_HEADER_SIZE + name_len + 7) & !7;
        if size > buf.len() {
            break;
        }

        let name = String::from_utf8_lossy(&buf[24..24 + name_len]).into_owned();
        out.push(DecodedDirent {
            inode,
            offset,
            kind,
            name,
        });
        buf = &buf[size..];
    }

    out
}
