//! Path Traversal Prevention Tests
//!
//! Archive member names are untrusted. Rooted and dotted names are
//! normalized into the tree; names that climb above the archive root are
//! refused outright.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use tar::{EntryType, Header};
use tempfile::NamedTempFile;
use tgzfs::{ErrorKind, InodeId, TgzFs, ROOT_INODE};

/// Helper: Archive whose member names are written verbatim into old-style headers
fn create_raw_archive(items: &[(&[u8], EntryType, &[u8])]) -> NamedTempFile {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, entry_type, data) in items {
        let mut header = Header::new_old();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_entry_type(*entry_type);
        header.set_mode(0o644);
        header.set_size(data.len() as u64);
        header.set_cksum();
        builder.append(&header, *data).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(&encoder.finish().unwrap()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Helper: Regular files only
fn create_file_archive(items: &[(&str, &[u8])]) -> NamedTempFile {
    let raw: Vec<(&[u8], EntryType, &[u8])> = items
        .iter()
        .map(|(name, data)| (name.as_bytes(), EntryType::Regular, *data))
        .collect();
    create_raw_archive(&raw)
}

/// Helper: Resolve a slash-separated path from the root
fn resolve(fs: &TgzFs, path: &str) -> Option<InodeId> {
    path.split('/').try_fold(ROOT_INODE, |parent, name| {
        fs.lookup(parent, name).ok().map(|(id, _)| id)
    })
}

/// Helper: Names directly under the root
fn root_names(fs: &TgzFs) -> Vec<String> {
    fs.directory_entries(ROOT_INODE, 0)
        .unwrap()
        .iter()
        .map(|entry| entry.name.clone())
        .collect()
}

#[test]
fn test_path_traversal_dot_dot() {
    let temp_file = create_file_archive(&[("../../etc/passwd", b"malicious")]);
    let err = TgzFs::open(temp_file.path()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Build);
}

#[test]
fn test_inner_traversal_escaping_root() {
    let temp_file = create_file_archive(&[("a/../../outside", b"x")]);
    let err = TgzFs::open(temp_file.path()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Build);
}

#[test]
fn test_inner_traversal_folded() {
    let temp_file = create_file_archive(&[("a/b/../c.txt", b"folded")]);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    assert!(resolve(&fs, "a/c.txt").is_some());
    assert!(resolve(&fs, "a/b").is_none());
}

#[test]
fn test_absolute_path_unix() {
    let temp_file = create_file_archive(&[("/etc/passwd", b"data")]);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    // Leading separator stripped; no empty-named directory appears
    assert_eq!(root_names(&fs), vec!["etc"]);
    let id = resolve(&fs, "etc/passwd").unwrap();
    let mut buf = [0u8; 8];
    let n = fs.read_file(id, 0, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"data");
}

#[test]
fn test_rooted_parent_clamped() {
    let temp_file = create_file_archive(&[("/../etc/hosts", b"127.0.0.1")]);
    let fs = TgzFs::open(temp_file.path()).unwrap();
    assert!(resolve(&fs, "etc/hosts").is_some());
}

#[test]
fn test_path_normalization() {
    let temp_file = create_file_archive(&[
        ("./dir/file1.txt", b"1"),
        ("dir//file2.txt", b"2"),
        ("dir/./file3.txt", b"3"),
    ]);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    assert_eq!(root_names(&fs), vec!["dir"]);
    let dir = resolve(&fs, "dir").unwrap();
    let names: Vec<_> = fs
        .directory_entries(dir, 0)
        .unwrap()
        .iter()
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(names, vec!["file1.txt", "file2.txt", "file3.txt"]);
}

#[test]
fn test_root_directory_entry_absorbed() {
    let temp_file = create_raw_archive(&[
        (b"./", EntryType::Directory, b""),
        (b"./a.txt", EntryType::Regular, b"a"),
    ]);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    assert_eq!(fs.tree().len(), 2);
    assert_eq!(root_names(&fs), vec!["a.txt"]);
}

#[test]
fn test_file_named_dot_rejected() {
    let temp_file = create_raw_archive(&[(b".", EntryType::Regular, b"x")]);
    let err = TgzFs::open(temp_file.path()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Build);
}

#[test]
fn test_backslash_is_not_a_separator() {
    let temp_file = create_file_archive(&[("C:\\Windows\\System32", b"data")]);
    let fs = TgzFs::open(temp_file.path()).unwrap();
    assert_eq!(root_names(&fs), vec!["C:\\Windows\\System32"]);
}

#[test]
fn test_path_with_special_characters() {
    let names = ["file with spaces.txt", "file-with-dashes.txt", "file@special#chars.txt", "файл.txt"];
    let items: Vec<(&str, &[u8])> = names.iter().map(|n| (*n, &b"x"[..])).collect();
    let temp_file = create_file_archive(&items);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    for name in names {
        assert!(fs.lookup(ROOT_INODE, name).is_ok(), "missing {}", name);
    }
}

#[test]
fn test_non_utf8_name_decoded_lossily() {
    let temp_file = create_raw_archive(&[(b"bad\xffname", EntryType::Regular, b"x")]);
    let fs = TgzFs::open(temp_file.path()).unwrap();
    assert!(fs.lookup(ROOT_INODE, "bad\u{FFFD}name").is_ok());
}

#[test]
fn test_path_case_sensitivity() {
    let temp_file = create_file_archive(&[("File.txt", b"upper"), ("file.txt", b"lower")]);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    let (upper, _) = fs.lookup(ROOT_INODE, "File.txt").unwrap();
    let (lower, _) = fs.lookup(ROOT_INODE, "file.txt").unwrap();
    assert_ne!(upper, lower);
    assert!(fs.lookup(ROOT_INODE, "FILE.TXT").is_err());
}

#[test]
fn test_long_gnu_names() {
    let long_name = format!("{}/{}.txt", "d".repeat(120), "f".repeat(150));

    let mut builder = tar::Builder::new(Vec::new());
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(4);
    header.set_mode(0o644);
    builder.append_data(&mut header, &long_name, &b"long"[..]).unwrap();
    let tar = builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(&encoder.finish().unwrap()).unwrap();
    temp_file.flush().unwrap();

    let fs = TgzFs::open(temp_file.path()).unwrap();
    let id = resolve(&fs, &long_name).unwrap();
    assert_eq!(fs.get_attributes(id).unwrap().size, 4);
}

#[test]
fn test_symlink_exposed_as_file() {
    let temp_file = create_raw_archive(&[
        (b"target.txt", EntryType::Regular, b"real"),
        (b"link.txt", EntryType::Symlink, b""),
    ]);
    let fs = TgzFs::open(temp_file.path()).unwrap();

    let (link, attrs) = fs.lookup(ROOT_INODE, "link.txt").unwrap();
    assert!(!attrs.is_dir());
    assert_eq!(attrs.size, 0);
    let mut buf = [0u8; 8];
    assert_eq!(fs.read_file(link, 0, &mut buf).unwrap(), 0);
}
