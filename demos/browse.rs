/// Browse a .tar.gz archive through the filesystem operations, without mounting
///
/// Run with: cargo run --example browse [path/to/archive.tar.gz]
///
/// With no argument, a small demo archive is built in memory.
use flate2::write::GzEncoder;
use flate2::Compression;
use std::error::Error;
use std::io::Write;
use tgzfs::fs::dirent::parse_dirents;
use tgzfs::{EntryKind, InodeId, MemorySource, TgzFs, ROOT_INODE};

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== tgzfs Browse Example ===\n");

    let fs = match std::env::args().nth(1) {
        Some(path) => {
            println!("1. Building filesystem from {}...", path);
            TgzFs::open(&path)?
        }
        None => {
            println!("1. Building filesystem from an in-memory demo archive...");
            TgzFs::build(MemorySource::new(demo_archive()?))?
        }
    };

    let stats = fs.statfs();
    println!("   ✓ {} inodes, {} blocks of {} bytes", stats.files, stats.blocks, stats.block_size);

    println!("\n2. Tree:");
    walk(&fs, ROOT_INODE, 1)?;

    println!("\n3. Paths recorded for reads:");
    for (id, location) in fs.path_index().iter().take(10) {
        println!("   {:>4}  {}", id, location.path);
    }

    println!("\n✓ Example complete!");
    Ok(())
}

fn walk(fs: &TgzFs, dir: InodeId, depth: usize) -> Result<(), Box<dyn Error>> {
    // Listing goes through the serialized form the transport receives
    let mut buf = vec![0u8; 64 * 1024];
    let n = fs.read_directory(dir, 0, &mut buf)?;

    for dirent in parse_dirents(&buf[..n]) {
        let indent = "   ".repeat(depth);
        let (child, attrs) = fs.lookup(dir, &dirent.name)?;
        match attrs.kind {
            EntryKind::Directory => {
                println!("{}{}/", indent, dirent.name);
                walk(fs, child, depth + 1)?;
            }
            EntryKind::File => {
                let mut preview = [0u8; 32];
                let read = fs.read_file(child, 0, &mut preview)?;
                println!(
                    "{}{} ({} bytes): {:?}",
                    indent,
                    dirent.name,
                    attrs.size,
                    String::from_utf8_lossy(&preview[..read])
                );
            }
        }
    }
    Ok(())
}

fn demo_archive() -> Result<Vec<u8>, Box<dyn Error>> {
    let mut builder = tar::Builder::new(Vec::new());
    let files: &[(&str, &[u8])] = &[
        ("site/index.html", b"<h1>Hello from tgzfs</h1>"),
        ("site/css/style.css", b"body { margin: 0; }"),
        ("site/notes.md", b"# Notes\n\nServed straight from the archive."),
        ("README", b"A demo archive."),
    ];
    for (path, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, *data)?;
    }
    let tar = builder.into_inner()?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar)?;
    Ok(encoder.finish()?)
}
