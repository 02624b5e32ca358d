use crate::tree::InodeId;
use std::io;
use thiserror::Error;

/// Result type for tgzfs operations
pub type Result<T> = std::result::Result<T, TgzfsError>;

/// Coarse classification of a [`TgzfsError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Archive could not be opened, decompressed, or parsed
    Stream,
    /// Malformed entry during tree construction
    Build,
    /// Unknown inode, child name, or unindexed file
    NotFound,
    /// Invalid listing offset, kind mismatch, or failure during a read
    Io,
    /// Configuration or serialization problem outside the filesystem core
    Other,
}

/// Unified error type for all tgzfs operations
#[derive(Debug, Error)]
pub enum TgzfsError {
    // Stream errors
    #[error("Archive stream error: {0}")]
    Stream(#[from] io::Error),

    #[error("Not a gzip stream (bad magic bytes)")]
    InvalidGzip,

    // Build errors
    #[error("Malformed archive entry {path:?}: {reason}")]
    MalformedEntry { path: String, reason: String },

    // Lookup errors
    #[error("No such inode: {0}")]
    InodeNotFound(InodeId),

    #[error("No entry named {name:?} in directory {parent}")]
    EntryNotFound { parent: InodeId, name: String },

    #[error("No archive path recorded for inode {0}")]
    PathNotIndexed(InodeId),

    // Operation errors
    #[error("Directory offset {offset} out of range for inode {inode} ({count} entries)")]
    InvalidOffset {
        inode: InodeId,
        offset: u64,
        count: usize,
    },

    #[error("Not a directory: inode {0}")]
    NotADirectory(InodeId),

    #[error("Is a directory: inode {0}")]
    IsADirectory(InodeId),

    #[error("Entry disappeared from archive: {0}")]
    EntryMissing(String),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mount failed: {0}")]
    Mount(#[source] io::Error),
}

impl TgzfsError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        TgzfsError::MalformedEntry {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify this error for reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            TgzfsError::Stream(_) | TgzfsError::InvalidGzip => ErrorKind::Stream,
            TgzfsError::MalformedEntry { .. } => ErrorKind::Build,
            TgzfsError::InodeNotFound(_)
            | TgzfsError::EntryNotFound { .. }
            | TgzfsError::PathNotIndexed(_) => ErrorKind::NotFound,
            TgzfsError::InvalidOffset { .. }
            | TgzfsError::NotADirectory(_)
            | TgzfsError::IsADirectory(_)
            | TgzfsError::EntryMissing(_)
            | TgzfsError::ReadFailed { .. } => ErrorKind::Io,
            TgzfsError::Config(_) | TgzfsError::Json(_) | TgzfsError::Mount(_) => {
                ErrorKind::Other
            }
        }
    }

    /// Errno value reported to the kernel transport
    pub fn errno(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => libc::ENOENT,
            ErrorKind::Stream | ErrorKind::Build | ErrorKind::Io => libc::EIO,
            ErrorKind::Other => libc::EINVAL,
        }
    }
}

impl From<toml::de::Error> for TgzfsError {
    fn from(err: toml::de::Error) -> Self {
        TgzfsError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TgzfsError {
    fn from(err: toml::ser::Error) -> Self {
        TgzfsError::Config(err.to_string())
    }
}

impl From<TgzfsError> for io::Error {
    fn from(err: TgzfsError) -> io::Error {
        match err {
            TgzfsError::Stream(e) => e,
            other => io::Error::from_raw_os_error(other.errno()),
        }
    }
}
