mod backend;
pub mod dirent;

#[cfg(feature = "fuse")]
pub mod fuse;

pub use backend::{FsStats, TgzFs, BLOCK_SIZE, MAX_NAME_LENGTH};
