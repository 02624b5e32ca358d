//! Mount configuration
//!
//! Loaded from a TOML file and/or assembled from command-line flags:
//!
//! ```toml
//! archive = "/srv/backups/site.tar.gz"
//! mount_point = "/mnt/site"
//! debug = false
//! fs_name = "tgzfs"
//! allow_other = false
//! attr_ttl_secs = 1
//! ```
//!
//! The mount is always read-only; there is no setting to change that.

use crate::error::{Result, TgzfsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountConfig {
    /// Compressed archive to serve
    #[serde(default)]
    pub archive: PathBuf,

    /// Directory to mount on
    #[serde(default)]
    pub mount_point: PathBuf,

    /// Verbose logging, including the transport's own request tracing
    #[serde(default)]
    pub debug: bool,

    /// Name shown as the mount source
    #[serde(default = "default_fs_name")]
    pub fs_name: String,

    /// Let users other than the mounter access the tree
    #[serde(default)]
    pub allow_other: bool,

    /// How long the kernel may cache attributes and lookups
    #[serde(default = "default_attr_ttl")]
    pub attr_ttl_secs: u64,
}

fn default_fs_name() -> String {
    "tgzfs".to_string()
}

fn default_attr_ttl() -> u64 {
    1
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            archive: PathBuf::new(),
            mount_point: PathBuf::new(),
            debug: false,
            fs_name: default_fs_name(),
            allow_other: false,
            attr_ttl_secs: default_attr_ttl(),
        }
    }
}

impl MountConfig {
    pub fn new<A: Into<PathBuf>, M: Into<PathBuf>>(archive: A, mount_point: M) -> Self {
        Self {
            archive: archive.into(),
            mount_point: mount_point.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TgzfsError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that both paths are set
    pub fn validate(&self) -> Result<()> {
        if self.archive.as_os_str().is_empty() {
            return Err(TgzfsError::Config("an archive path is required".to_string()));
        }
        if self.mount_point.as_os_str().is_empty() {
            return Err(TgzfsError::Config("a mount point is required".to_string()));
        }
        Ok(())
    }

    pub fn attr_ttl(&self) -> Duration {
        Duration::from_secs(self.attr_ttl_secs)
    }
}
