use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use ros_extract::artifacts::DEFAULT_PREFIX;

/// Host used when neither `--host` nor the snapshot names one.
pub const DEFAULT_HOST: &str = "192.168.3.1";
pub const DEFAULT_USERNAME: &str = "admin";

#[derive(Parser, Debug)]
#[command(name = "ros-extract")]
#[command(about = "Turn MikroTik RouterOS snapshots into provisioning scripts and env files")]
pub struct Cli {
    /// Log classification decisions (debug level).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Write the .rsc script and .env file (and optionally a JSON dump) for a snapshot.
    Extract(ExtractArgs),
    /// Show inferred VLAN roles, networks, port groups and diagnostics.
    Classify(ClassifyArgs),
    /// Print the RouterOS script for a snapshot.
    Script(ScriptArgs),
    /// Print the provisioning env file for a snapshot.
    Env(EnvArgs),
}

/// Options shared by every command that reads a snapshot.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// JSON snapshot of the device configuration.
    pub snapshot: PathBuf,
    /// Vocabulary TOML overriding the embedded role keywords and port rules.
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,
    /// Fail when inference reports any diagnostic.
    #[arg(long)]
    pub strict: bool,
}

/// Where the generated documents say the data came from.
#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device address. Defaults to the snapshot's extraction host.
    #[arg(long)]
    pub host: Option<String>,
    /// RouterOS user written into the env file.
    #[arg(long, short = 'u', default_value = DEFAULT_USERNAME)]
    pub username: String,
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    #[command(flatten)]
    pub device: DeviceArgs,
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,
    /// File name prefix.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,
    /// Also write the normalized snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// JSON snapshot of the device configuration.
    pub snapshot: PathBuf,
    /// Device address. Defaults to the snapshot's extraction host.
    #[arg(long)]
    pub host: Option<String>,
}

#[derive(Parser, Debug)]
pub struct EnvArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    #[command(flatten)]
    pub device: DeviceArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
