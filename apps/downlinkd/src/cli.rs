//! Command line interface definition

use clap::Parser;
use std::path::PathBuf;

/// downlinkd - secure download issuance service
#[derive(Parser, Debug)]
#[command(name = "downlinkd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Issues signed download links and streams verified artifacts")]
#[command(long_about = None)]
pub struct Cli {
    /// Use alternate config file (default: ./downlink.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bind address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Base URL download links are built against
    #[arg(long, value_name = "URL")]
    pub public_url: Option<String>,

    /// Directory artifacts are served from
    #[arg(long, value_name = "DIR")]
    pub artifact_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
