#![no_main]

use libfuzzer_sys::fuzz_target;
use tgzfs::{MemorySource, TgzFs, ROOT_INODE};

fuzz_target!(|data: &[u8]| {
    // Build from arbitrary bytes - should never panic
    let fs = match TgzFs::build(MemorySource::new(data.to_vec())) {
        Ok(fs) => fs,
        Err(_) => return, // Expected for invalid data
    };

    let mut dirents = [0u8; 4096];
    let mut content = [0u8; 256];

    // Walk every inode through every operation
    for inode in fs.tree().iter() {
        let id = inode.id();
        let _ = fs.get_attributes(id);
        let _ = fs.open_directory(id);
        let _ = fs.open_file(id);
        let _ = fs.read_directory(id, 0, &mut dirents);
        let _ = fs.read_directory(id, u64::MAX, &mut dirents);
        let _ = fs.read_file(id, 0, &mut content);
        let _ = fs.read_file(id, u64::MAX, &mut content);

        for child in inode.children() {
            let _ = fs.lookup(id, &child.name);
        }
    }

    let _ = fs.lookup(ROOT_INODE, "");
    let _ = fs.lookup(ROOT_INODE, "..");
    let _ = fs.statfs();
    let _ = fs.snapshot().to_json();
});
