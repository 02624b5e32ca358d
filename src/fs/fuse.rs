//! Kernel transport binding via `fuser`
//!
//! Every callback is a thin translation onto [`TgzFs`]: arguments are
//! validated and converted, the backend does the work, and its error is
//! reported as an errno. Write-side callbacks keep fuser's default `ENOSYS`
//! reply, and the mount itself is read-only.

use crate::config::MountConfig;
use crate::error::{Result, TgzfsError};
use crate::fs::backend::{TgzFs, BLOCK_SIZE};
use crate::tree::{DirectoryEntry, EntryKind, InodeAttributes, InodeId};
use fuser::{
    BackgroundSession, FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyData,
    ReplyDirectory, ReplyEntry, ReplyOpen, ReplyStatfs, Request,
};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::warn;

/// Adapter handed to the fuser session
pub struct FuseAdapter {
    fs: Arc<TgzFs>,
    ttl: Duration,
    mounted_at: SystemTime,
    uid: u32,
    gid: u32,
}

impl FuseAdapter {
    pub fn new(fs: Arc<TgzFs>, ttl: Duration) -> Self {
        // SAFETY: getuid/getgid have no preconditions and cannot fail
        let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
        Self {
            fs,
            ttl,
            mounted_at: SystemTime::now(),
            uid,
            gid,
        }
    }

    fn file_attr(&self, ino: InodeId, attributes: &InodeAttributes) -> FileAttr {
        FileAttr {
            ino,
            size: attributes.size,
            blocks: attributes.size.div_ceil(u64::from(BLOCK_SIZE)),
            atime: self.mounted_at,
            mtime: self.mounted_at,
            ctime: self.mounted_at,
            crtime: self.mounted_at,
            kind: file_type(attributes.kind),
            perm: attributes.permissions(),
            nlink: attributes.nlink,
            uid: self.uid,
            gid: self.gid,
            rdev: 0,
            blksize: BLOCK_SIZE,
            flags: 0,
        }
    }
}

fn file_type(kind: EntryKind) -> FileType {
    match kind {
        EntryKind::Directory => FileType::Directory,
        EntryKind::File => FileType::RegularFile,
    }
}

/// Hand entries to `add` until it reports a full buffer
///
/// Each accepted entry's offset is the cookie the kernel passes back to
/// resume the listing. Returns how many entries were accepted.
fn fill_directory<F>(entries: &[DirectoryEntry], mut add: F) -> usize
where
    F: FnMut(&DirectoryEntry) -> bool,
{
    let mut accepted = 0;
    for entry in entries {
        if add(entry) {
            break;
        }
        accepted += 1;
    }
    accepted
}

impl Filesystem for FuseAdapter {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        // Archive names are UTF-8 (lossy) so a non-UTF-8 name cannot exist
        let Some(name) = name.to_str() else {
            reply.error(libc::ENOENT);
            return;
        };
        match self.fs.lookup(parent, name) {
            Ok((ino, attributes)) => reply.entry(&self.ttl, &self.file_attr(ino, &attributes), 0),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyAttr) {
        match self.fs.get_attributes(ino) {
            Ok(attributes) => reply.attr(&self.ttl, &self.file_attr(ino, &attributes)),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.fs.open_directory(ino) {
            Ok(()) => reply.opened(0, 0),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(libc::EINVAL);
            return;
        };
        match self.fs.directory_entries(ino, offset) {
            Ok(entries) => {
                fill_directory(entries, |entry| {
                    reply.add(entry.inode, entry.offset as i64, file_type(entry.kind), &entry.name)
                });
                reply.ok();
            }
            Err(e) => reply.error(e.errno()),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.fs.open_file(ino) {
            Ok(()) => reply.opened(0, 0),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock_owner: Option<u64>,
        reply: ReplyData,
    ) {
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(libc::EINVAL);
            return;
        };
        let mut buf = vec![0u8; size as usize];
        match self.fs.read_file(ino, offset, &mut buf) {
            Ok(n) => reply.data(&buf[..n]),
            Err(e) => reply.error(e.errno()),
        }
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyStatfs) {
        let stats = self.fs.statfs();
        reply.statfs(
            stats.blocks,
            0,
            0,
            stats.files,
            0,
            stats.block_size,
            stats.name_length,
            stats.block_size,
        );
    }
}

/// Options for a read-only mount described by `config`
pub fn mount_options(config: &MountConfig) -> Vec<MountOption> {
    let mut options = vec![
        MountOption::RO,
        MountOption::FSName(config.fs_name.clone()),
        MountOption::Subtype("tgzfs".to_string()),
        MountOption::DefaultPermissions,
    ];
    if config.allow_other {
        options.push(MountOption::AllowOther);
    }
    options
}

/// Mount in a background thread; dropping the session unmounts
pub fn spawn_mount(fs: Arc<TgzFs>, config: &MountConfig) -> Result<BackgroundSession> {
    config.validate()?;
    let adapter = FuseAdapter::new(fs, config.attr_ttl());
    fuser::spawn_mount2(adapter, &config.mount_point, &mount_options(config)).map_err(|e| {
        warn!(mount_point = %config.mount_point.display(), error = %e, "Mount failed");
        TgzfsError::Mount(e)
    })
}

/// Mount and block until the filesystem is unmounted
pub fn mount(fs: Arc<TgzFs>, config: &MountConfig) -> Result<()> {
    config.validate()?;
    let adapter = FuseAdapter::new(fs, config.attr_ttl());
    fuser::mount2(adapter, &config.mount_point, &mount_options(config)).map_err(TgzfsError::Mount)
}
