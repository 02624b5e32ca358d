//! In-memory `.tar.gz` construction for unit tests

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};
use tar::{EntryType, Header};

pub(crate) struct TgzBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TgzBuilder {
    pub(crate) fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    pub(crate) fn file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    pub(crate) fn dir(mut self, path: &str) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mode(0o755);
        header.set_size(0);
        self.builder
            .append_data(&mut header, path, io::empty())
            .unwrap();
        self
    }

    /// Append an entry whose name is written verbatim, bypassing path checks
    pub(crate) fn raw(mut self, name: &str, entry_type: EntryType, data: &[u8]) -> Self {
        let mut header = Header::new_old();
        let name_bytes = name.as_bytes();
        header.as_old_mut().name[..name_bytes.len()].copy_from_slice(name_bytes);
        header.set_entry_type(entry_type);
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        let tar = self.builder.into_inner().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar).unwrap();
        encoder.finish().unwrap()
    }
}
