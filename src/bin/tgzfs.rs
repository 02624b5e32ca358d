//! tgzfs mount binary.
//!
//! Usage:
//!   tgzfs --tar-file site.tar.gz --mount-point /mnt/site
//!   tgzfs --config tgzfs.toml --debug
//!   tgzfs --tar-file site.tar.gz --print-tree
//!
//! Runs until SIGINT or SIGTERM, then unmounts.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use tgzfs::fs::fuse::spawn_mount;
use tgzfs::{MountConfig, TgzFs};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Mount a .tar.gz archive as a read-only filesystem.
#[derive(Parser, Debug)]
#[command(name = "tgzfs")]
#[command(about = "Mount a gzip-compressed tar archive read-only")]
struct Args {
    /// Archive to mount
    #[arg(long = "tar-file")]
    tar_file: Option<PathBuf>,

    /// Directory to mount on
    #[arg(long = "mount-point", alias = "mount_point")]
    mount_point: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging, including FUSE request tracing
    #[arg(long)]
    debug: bool,

    /// Allow other users to access the mount
    #[arg(long)]
    allow_other: bool,

    /// Print the tree as JSON and exit without mounting
    #[arg(long)]
    print_tree: bool,
}

impl Args {
    fn resolve(&self) -> Result<MountConfig> {
        let mut config = match &self.config {
            Some(path) => MountConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => MountConfig::default(),
        };

        if let Some(archive) = &self.tar_file {
            config.archive = archive.clone();
        }
        if let Some(mount_point) = &self.mount_point {
            config.mount_point = mount_point.clone();
        }
        config.debug |= self.debug;
        config.allow_other |= self.allow_other;
        Ok(config)
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.resolve()?;
    init_tracing(config.debug);

    anyhow::ensure!(
        !config.archive.as_os_str().is_empty(),
        "You must set --tar-file"
    );

    let fs = TgzFs::open(&config.archive)
        .with_context(|| format!("building filesystem from {}", config.archive.display()))?;

    if args.print_tree {
        let json = fs.snapshot().to_json()?;
        println!("{}", String::from_utf8_lossy(&json));
        return Ok(());
    }

    config.validate().context("You must set --mount-point")?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })
    .context("installing signal handler")?;

    let session = spawn_mount(Arc::new(fs), &config).context("mounting")?;
    info!(
        archive = %config.archive.display(),
        mount_point = %config.mount_point.display(),
        "Mounted; waiting for interrupt"
    );

    shutdown_rx.recv().context("signal channel closed")?;
    info!("Unmounting");
    drop(session);

    Ok(())
}
